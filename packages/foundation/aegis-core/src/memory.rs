//! Memory nodes, confidence edges, and the retry-buffer's queued
//! operation shape.

use crate::ids::{EntityId, MemoryId, NpcId};
use crate::time::MeshTimestamp;
use serde::{Deserialize, Serialize};

/// Player actions that drive both confidence updates and behavioral
/// action effects. One closed enum shared by both components so the
/// action vocabulary cannot drift between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Reward,
    Punishment,
    Command,
    Dialogue,
    Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryNode {
    #[serde(rename = "memoryId")]
    pub memory_id: MemoryId,
    #[serde(rename = "npcId")]
    pub npc_id: NpcId,
    pub event: String,
    #[serde(rename = "playerAction")]
    pub player_action: Option<PlayerAction>,
    #[serde(rename = "wisdomScore")]
    pub wisdom_score: f64,
    #[serde(rename = "traumaScore")]
    pub trauma_score: f64,
    #[serde(rename = "rawTraumaScore")]
    pub raw_trauma_score: f64,
    pub timestamp: MeshTimestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceEdge {
    #[serde(rename = "npcId")]
    pub npc_id: NpcId,
    #[serde(rename = "entityId")]
    pub entity_id: EntityId,
    pub confidence: f64,
    #[serde(rename = "decayRate")]
    pub decay_rate: f64,
    #[serde(rename = "lastUpdated")]
    pub last_updated: MeshTimestamp,
}

impl ConfidenceEdge {
    pub fn new(npc_id: NpcId, entity_id: EntityId) -> Self {
        Self {
            npc_id,
            entity_id,
            confidence: 0.5,
            decay_rate: 0.1,
            last_updated: MeshTimestamp::now(),
        }
    }
}

/// An operation awaiting replay against the backend once it becomes
/// reachable again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedOperation {
    pub query: String,
    pub params: serde_json::Value,
    #[serde(rename = "enqueuedAt")]
    pub enqueued_at: MeshTimestamp,
}
