//! Provider descriptors and per-provider circuit breaker state shape.
//! The state machine logic itself lives in `aegis-nexus`; this module
//! holds only the data shape shared across crates (e.g. `aegis-gate`'s
//! routing needs to read it).

use crate::ids::ProviderId;
use crate::time::MeshTimestamp;
use crate::Tier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub tier: Tier,
    pub costs: f64,
    #[serde(rename = "maxTokens")]
    pub max_tokens: u32,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    #[serde(rename = "providerId")]
    pub provider_id: ProviderId,
    pub priority: u32,
    #[serde(rename = "enabledFlag")]
    pub enabled_flag: bool,
    pub models: Vec<ModelDescriptor>,
}

impl ProviderDescriptor {
    /// The default model covering `tier`, falling back to any model that
    /// covers the tier when no model is flagged default for it.
    pub fn model_for_tier(&self, tier: Tier) -> Option<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.tier == tier && m.is_default)
            .or_else(|| self.models.iter().find(|m| m.tier == tier))
    }

    pub fn covers_tier(&self, tier: Tier) -> bool {
        self.models.iter().any(|m| m.tier == tier)
    }
}

/// Tagged circuit breaker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum CircuitState {
    Closed { failure_count: u32 },
    Open { opened_at: MeshTimestamp },
    HalfOpen { probe_in_flight: bool },
}

impl Default for CircuitState {
    fn default() -> Self {
        CircuitState::Closed { failure_count: 0 }
    }
}
