//! Registry of providers and their circuit breakers: a register/lookup
//! map keyed by provider id, with tier-filtered candidate queries for
//! routing.

use aegis_core::{ProviderDescriptor, ProviderId, Tier};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::breaker::{BreakerConfig, CircuitBreaker};

pub struct ProviderRegistry {
    descriptors: RwLock<HashMap<ProviderId, ProviderDescriptor>>,
    breakers: RwLock<HashMap<ProviderId, Arc<CircuitBreaker>>>,
    breaker_config: BreakerConfig,
}

impl ProviderRegistry {
    pub fn new(breaker_config: BreakerConfig) -> Self {
        Self {
            descriptors: RwLock::new(HashMap::new()),
            breakers: RwLock::new(HashMap::new()),
            breaker_config,
        }
    }

    pub fn register(&self, descriptor: ProviderDescriptor) {
        let provider_id = descriptor.provider_id.clone();
        tracing::info!(provider = %provider_id, "registered provider");
        self.breakers
            .write()
            .entry(provider_id.clone())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(self.breaker_config)));
        self.descriptors.write().insert(provider_id, descriptor);
    }

    pub fn breaker(&self, provider_id: &ProviderId) -> Option<Arc<CircuitBreaker>> {
        self.breakers.read().get(provider_id).cloned()
    }

    pub fn descriptor(&self, provider_id: &ProviderId) -> Option<ProviderDescriptor> {
        self.descriptors.read().get(provider_id).cloned()
    }

    /// Enabled providers covering `tier`, ascending by priority.
    pub fn candidates_for_tier(&self, tier: Tier) -> Vec<ProviderDescriptor> {
        let descriptors = self.descriptors.read();
        let mut candidates: Vec<ProviderDescriptor> = descriptors
            .values()
            .filter(|d| d.enabled_flag && d.covers_tier(tier))
            .cloned()
            .collect();
        candidates.sort_by_key(|d| d.priority);
        candidates
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}
