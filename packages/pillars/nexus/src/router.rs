//! Provider/model routing: start with the tier's
//! default (highest-priority) provider; if its breaker forbids requests,
//! iterate enabled providers ascending by priority for the first whose
//! breaker allows and whose catalog covers the tier.

use aegis_core::{ModelDescriptor, ProviderId, Tier};

use crate::error::NexusError;
use crate::registry::ProviderRegistry;

#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub provider_id: ProviderId,
    pub model: ModelDescriptor,
    pub failover: bool,
}

pub fn route(registry: &ProviderRegistry, tier: Tier) -> Result<RoutingDecision, NexusError> {
    let candidates = registry.candidates_for_tier(tier);
    if candidates.is_empty() {
        return Err(NexusError::NoProviderAvailable);
    }

    for (index, descriptor) in candidates.iter().enumerate() {
        let Some(breaker) = registry.breaker(&descriptor.provider_id) else {
            continue;
        };
        if !breaker.is_allowed() {
            continue;
        }
        let Some(model) = descriptor.model_for_tier(tier) else {
            continue;
        };
        return Ok(RoutingDecision {
            provider_id: descriptor.provider_id.clone(),
            model: model.clone(),
            failover: index > 0,
        });
    }

    Err(NexusError::NoProviderAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::ModelDescriptor as Model;
    use aegis_core::ProviderDescriptor;

    fn provider(id: &str, priority: u32) -> ProviderDescriptor {
        ProviderDescriptor {
            provider_id: ProviderId::new(id),
            priority,
            enabled_flag: true,
            models: vec![Model {
                id: format!("{id}-model"),
                tier: Tier::Routine,
                costs: 0.01,
                max_tokens: 1024,
                is_default: true,
            }],
        }
    }

    #[test]
    fn routes_to_default_provider_when_breaker_closed() {
        let registry = ProviderRegistry::default();
        registry.register(provider("a", 0));
        registry.register(provider("b", 1));
        let decision = route(&registry, Tier::Routine).unwrap();
        assert_eq!(decision.provider_id.as_str(), "a");
        assert!(!decision.failover);
    }

    #[test]
    fn fails_over_when_default_breaker_is_open() {
        let registry = ProviderRegistry::default();
        registry.register(provider("a", 0));
        registry.register(provider("b", 1));
        let breaker = registry.breaker(&ProviderId::new("a")).unwrap();
        for _ in 0..5 {
            breaker.record_failure();
        }
        let decision = route(&registry, Tier::Routine).unwrap();
        assert_eq!(decision.provider_id.as_str(), "b");
        assert!(decision.failover);
    }

    #[test]
    fn no_candidates_is_circuit_open_equivalent() {
        let registry = ProviderRegistry::default();
        let result = route(&registry, Tier::Strategic);
        assert!(matches!(result, Err(NexusError::NoProviderAvailable)));
    }
}
