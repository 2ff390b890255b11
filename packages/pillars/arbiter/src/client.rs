//! `BehaviorEngineClient`: the seam `aegis-gate`'s pipeline calls
//! through to query rebellion probability. Modeled as a trait so an
//! in-process call path and a future streaming/RPC transport can share
//! one interface.

use aegis_core::NpcId;
use async_trait::async_trait;
use std::sync::Arc;

use crate::registry::BehaviorRegistry;

#[derive(Debug, Clone, Copy)]
pub struct RebellionProfile {
    pub probability: f64,
    pub threshold_exceeded: bool,
}

#[async_trait]
pub trait BehaviorEngineClient: Send + Sync {
    async fn rebellion_probability(&self, npc_id: &NpcId) -> Result<RebellionProfile, String>;
}

/// Default in-process transport: calls the registry directly, no
/// network hop. Always succeeds — failure only arises for an actual RPC
/// transport, which is why the safe-default fallback lives in the
/// caller (`aegis-gate`), not here.
pub struct InProcessBehaviorEngineClient {
    registry: Arc<BehaviorRegistry>,
}

impl InProcessBehaviorEngineClient {
    pub fn new(registry: Arc<BehaviorRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl BehaviorEngineClient for InProcessBehaviorEngineClient {
    async fn rebellion_probability(&self, npc_id: &NpcId) -> Result<RebellionProfile, String> {
        let result = self.registry.rebellion_probability(npc_id);
        Ok(RebellionProfile {
            probability: result.probability,
            threshold_exceeded: result.threshold_exceeded,
        })
    }
}
