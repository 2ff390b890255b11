//! The seven-stage event pipeline: classify → route → call →
//! rebellion check → cognitive rails → broadcast → audit. One call to
//! [`Pipeline::process`] drives an `Event` end to end; `process_batch`
//! preserves input order while running the stages for each event
//! independently — a slow or vetoed event never blocks its neighbors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use aegis_arbiter::{BehaviorEngineClient, RebellionProfile};
use aegis_core::{Event, MeshError, Tier};
use aegis_nexus::{router, ProviderRegistry, ResilientProviderClient};
use aegis_telemetry::Bus;

use crate::audit::{AuditEntry, AuditLog, AuditResult};
use crate::rails::{self, RailsConfig};

#[derive(Debug, Clone, serde::Serialize)]
pub struct MeshResponse {
    pub event_id: String,
    pub tier: Tier,
    pub content: String,
    pub provider: String,
    pub model: String,
    pub failover: bool,
    pub latency_ms: u64,
    pub cost: f64,
}

pub struct Pipeline {
    providers: Arc<ProviderRegistry>,
    provider_client: ResilientProviderClient,
    behavior_client: Arc<dyn BehaviorEngineClient>,
    bus: Arc<Bus>,
    audit: Arc<AuditLog>,
    rails_config: RailsConfig,
}

impl Pipeline {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        behavior_client: Arc<dyn BehaviorEngineClient>,
        bus: Arc<Bus>,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            provider_client: ResilientProviderClient::new(providers.clone()),
            providers,
            behavior_client,
            bus,
            audit,
            rails_config: RailsConfig::default(),
        }
    }

    /// Runs `event` through all seven stages. Always returns `Ok` except
    /// for stage-2/3 provider-side failures (circuit open, no provider,
    /// timeout) — a rails veto is carried as `Ok`, not an error; it is a
    /// first-class result.
    pub async fn process(&self, event: &Event) -> Result<PipelineOutcome, MeshError> {
        let started = Instant::now();

        // Stage 1: classify.
        let tier = event.classify();
        self.bus.publish(
            "telemetry",
            serde_json::json!({"stage": "classified", "eventId": event.event_id, "tier": tier}),
        );

        // Stage 2: route.
        let decision = match router::route(&self.providers, tier) {
            Ok(decision) => decision,
            Err(err) => {
                self.record_error(tier, started.elapsed());
                return Err(err.into());
            }
        };

        // Stage 3: call.
        let prompt = crate::prompt::assemble(event, tier);
        let response = match self
            .provider_client
            .call(&decision.provider_id, tier, &prompt, tier.latency_budget())
            .await
        {
            Ok(response) => response,
            Err(err) => {
                self.record_error(tier, started.elapsed());
                return Err(MeshError::from(err));
            }
        };

        // Stage 4: rebellion check.
        let rebellion = self
            .behavior_client
            .rebellion_probability(&event.npc_id)
            .await
            .unwrap_or(RebellionProfile {
                probability: 0.0,
                threshold_exceeded: false,
            });

        // Stage 5: cognitive rails.
        let veto = rails::evaluate(
            event,
            tier,
            &rebellion,
            &response.content,
            started.elapsed(),
            &self.rails_config,
        );

        let outcome = if let Some(veto) = veto {
            self.bus.publish(
                "cognitive-rails",
                serde_json::json!({
                    "eventId": event.event_id,
                    "predicate": veto.predicate,
                    "reason": veto.reason,
                }),
            );
            self.bus.publish(
                "rebellion-alerts",
                serde_json::json!({
                    "npcId": event.npc_id,
                    "probability": rebellion.probability,
                    "predicate": veto.predicate,
                }),
            );
            PipelineOutcome::Vetoed {
                predicate: veto.predicate,
                reason: veto.reason,
            }
        } else {
            // Stage 6: broadcast.
            self.bus.publish(
                "npc-events",
                serde_json::json!({
                    "eventId": event.event_id,
                    "npcId": event.npc_id,
                    "content": response.content,
                }),
            );
            PipelineOutcome::Accepted(MeshResponse {
                event_id: event.event_id.to_string(),
                tier,
                content: response.content,
                provider: decision.provider_id.to_string(),
                model: decision.model.id,
                failover: decision.failover,
                latency_ms: response.latency_ms,
                cost: response.cost,
            })
        };

        // Stage 7: audit.
        self.audit.append(AuditEntry {
            tier,
            provider: Some(decision.provider_id.to_string()),
            model: Some(decision.model.id.clone()),
            latency_ms: response.latency_ms,
            cost: response.cost,
            failover: Some(decision.failover),
            result: match &outcome {
                PipelineOutcome::Accepted(_) => AuditResult::Accepted,
                PipelineOutcome::Vetoed { .. } => AuditResult::Vetoed,
            },
            timestamp: aegis_core::MeshTimestamp::now(),
        });

        Ok(outcome)
    }

    /// Processes every event independently, preserving input order in
    /// the result vector regardless of each event's individual latency.
    pub async fn process_batch(&self, events: &[Event]) -> Vec<Result<PipelineOutcome, MeshError>> {
        let futures = events.iter().map(|event| self.process(event));
        futures::future::join_all(futures).await
    }

    fn record_error(&self, tier: Tier, elapsed: Duration) {
        self.audit.append(AuditEntry {
            tier,
            provider: None,
            model: None,
            latency_ms: elapsed.as_millis() as u64,
            cost: 0.0,
            failover: None,
            result: AuditResult::Error,
            timestamp: aegis_core::MeshTimestamp::now(),
        });
    }
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Accepted(MeshResponse),
    Vetoed { predicate: &'static str, reason: String },
}
