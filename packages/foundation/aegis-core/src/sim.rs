//! Simulation tick snapshot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLevel {
    pub quantity: f64,
    #[serde(rename = "productionRate")]
    pub production_rate: f64,
    #[serde(rename = "consumptionRate")]
    pub consumption_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    pub sim: ResourceLevel,
    pub rapidlum: ResourceLevel,
    pub mineral: ResourceLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facilities {
    pub refineries: u32,
    pub mines: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    #[serde(rename = "activeNPCs")]
    pub active_npcs: u32,
    #[serde(rename = "overallRebellionProbability")]
    pub overall_rebellion_probability: f64,
}

/// World-scoped infestation/plague state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfestationState {
    /// `[0, 100]`.
    pub counter: f64,
    #[serde(rename = "isPlagueHeart")]
    pub is_plague_heart: bool,
    /// `[0, 1]`.
    #[serde(rename = "throttleMultiplier")]
    pub throttle_multiplier: f64,
}

impl Default for InfestationState {
    fn default() -> Self {
        Self {
            counter: 0.0,
            is_plague_heart: false,
            throttle_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationTickSnapshot {
    #[serde(rename = "tickNumber")]
    pub tick_number: u64,
    pub resources: ResourcePool,
    pub facilities: Facilities,
    pub population: Population,
    pub infestation: InfestationState,
}
