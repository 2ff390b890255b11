//! NPC behavioral state, mutated only through behavior-engine action
//! application.

use crate::ids::NpcId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcBehavioralState {
    #[serde(rename = "npcId")]
    pub npc_id: NpcId,
    #[serde(rename = "workEfficiency")]
    pub work_efficiency: f64,
    pub morale: f64,
    #[serde(rename = "avgTrauma")]
    pub avg_trauma: f64,
    #[serde(default)]
    pub role: Option<String>,
}

impl NpcBehavioralState {
    /// Lazily-created default state for an NPC seen for the first time.
    pub fn new(npc_id: NpcId) -> Self {
        Self {
            npc_id,
            work_efficiency: 0.5,
            morale: 0.5,
            avg_trauma: 0.0,
            role: None,
        }
    }
}
