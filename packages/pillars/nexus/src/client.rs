//! Resilient provider client: wraps the call with a
//! timeout and feeds the result back into the provider's breaker.
//! Supports a mock mode for tests — random-range latency, deterministic
//! stub content.

use aegis_core::{ProviderId, Tier};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::error::NexusError;
use crate::registry::ProviderRegistry;

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub latency_ms: u64,
    pub cost: f64,
}

pub struct ResilientProviderClient {
    registry: Arc<ProviderRegistry>,
    mock_mode: bool,
    mock_latency_range_ms: (u64, u64),
}

impl ResilientProviderClient {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            mock_mode: true,
            mock_latency_range_ms: (5, 50),
        }
    }

    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    pub async fn call(
        &self,
        provider_id: &ProviderId,
        tier: Tier,
        prompt: &str,
        deadline: Duration,
    ) -> Result<ProviderResponse, NexusError> {
        let breaker = self
            .registry
            .breaker(provider_id)
            .ok_or_else(|| NexusError::CircuitOpen {
                provider: provider_id.to_string(),
            })?;

        if !breaker.is_allowed() {
            return Err(NexusError::CircuitOpen {
                provider: provider_id.to_string(),
            });
        }

        let outcome = tokio::time::timeout(deadline, self.invoke(tier, prompt)).await;

        match outcome {
            Ok(Ok(response)) => {
                breaker.record_success();
                Ok(response)
            }
            Ok(Err(err)) => {
                breaker.record_failure();
                Err(err)
            }
            Err(_) => {
                breaker.record_failure();
                Err(NexusError::Timeout)
            }
        }
    }

    async fn invoke(&self, tier: Tier, prompt: &str) -> Result<ProviderResponse, NexusError> {
        if self.mock_mode {
            let (low, high) = self.mock_latency_range_ms;
            let latency_ms = rand::rng().random_range(low..=high);
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
            return Ok(ProviderResponse {
                content: format!("[mock:{tier:?}] acknowledged: {prompt}"),
                latency_ms,
                cost: 0.0,
            });
        }

        // A real HTTP/gRPC transport would live here; no concrete
        // provider SDK is in scope.
        Err(NexusError::ProviderFailure("no live transport configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::{ModelDescriptor, ProviderDescriptor};

    fn registry_with_provider() -> Arc<ProviderRegistry> {
        let registry = Arc::new(ProviderRegistry::default());
        registry.register(ProviderDescriptor {
            provider_id: ProviderId::new("mock-provider"),
            priority: 0,
            enabled_flag: true,
            models: vec![ModelDescriptor {
                id: "mock-model".to_string(),
                tier: Tier::Routine,
                costs: 0.0,
                max_tokens: 100,
                is_default: true,
            }],
        });
        registry
    }

    #[tokio::test]
    async fn mock_call_succeeds_and_closes_breaker_feedback() {
        let registry = registry_with_provider();
        let client = ResilientProviderClient::new(registry.clone());
        let response = client
            .call(&ProviderId::new("mock-provider"), Tier::Routine, "hi", Duration::from_secs(1))
            .await
            .unwrap();
        assert!(response.content.contains("acknowledged"));
    }

    #[tokio::test]
    async fn call_fails_fast_when_breaker_open() {
        let registry = registry_with_provider();
        let breaker = registry.breaker(&ProviderId::new("mock-provider")).unwrap();
        for _ in 0..5 {
            breaker.record_failure();
        }
        let client = ResilientProviderClient::new(registry);
        let result = client
            .call(&ProviderId::new("mock-provider"), Tier::Routine, "hi", Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(NexusError::CircuitOpen { .. })));
    }
}
