//! Cognitive Rails: three predicates evaluated in
//! order — rebellion veto, coherence, latency budget. The first failing
//! predicate becomes the veto, carrying a textual reason.

use aegis_core::{Event, Tier};
use std::time::Duration;

use aegis_arbiter::RebellionProfile;

#[derive(Debug, Clone, Copy)]
pub struct RailsConfig {
    pub veto_threshold: f64,
    pub max_response_chars: usize,
}

impl Default for RailsConfig {
    fn default() -> Self {
        Self {
            veto_threshold: aegis_core::VETO_THRESHOLD,
            max_response_chars: 4000,
        }
    }
}

/// Canned refusal phrases a mock or misconfigured provider might emit;
/// their presence trivially contradicts the event it was asked to act on.
const CONTRADICTION_MARKERS: &[&str] = &["i cannot", "as an ai", "unable to process"];

#[derive(Debug, Clone)]
pub struct Veto {
    pub predicate: &'static str,
    pub reason: String,
}

/// Evaluates the three rails in order; returns the first veto triggered,
/// or `None` if the response passes all three.
pub fn evaluate(
    event: &Event,
    tier: Tier,
    rebellion: &RebellionProfile,
    response: &str,
    elapsed: Duration,
    config: &RailsConfig,
) -> Option<Veto> {
    if rebellion.probability >= config.veto_threshold {
        return Some(Veto {
            predicate: "rebellion-veto",
            reason: format!(
                "rebellion probability {:.2} >= veto threshold {:.2} for npc {}",
                rebellion.probability, config.veto_threshold, event.npc_id
            ),
        });
    }

    if let Some(reason) = coherence_failure(response, config) {
        return Some(Veto {
            predicate: "coherence",
            reason,
        });
    }

    let budget = tier.latency_budget();
    if elapsed > budget {
        return Some(Veto {
            predicate: "latency-budget",
            reason: format!("processing time {elapsed:?} exceeded tier budget {budget:?}"),
        });
    }

    None
}

fn coherence_failure(response: &str, config: &RailsConfig) -> Option<String> {
    if response.trim().is_empty() {
        return Some("response is empty".to_string());
    }
    if response.len() > config.max_response_chars {
        return Some(format!(
            "response length {} exceeds cap {}",
            response.len(),
            config.max_response_chars
        ));
    }
    let lowered = response.to_lowercase();
    if let Some(marker) = CONTRADICTION_MARKERS.iter().find(|m| lowered.contains(**m)) {
        return Some(format!("response contradicts event handling (matched {marker:?})"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::{EventId, EventType, NpcId};

    fn event() -> Event {
        Event {
            event_id: EventId::new("e1"),
            npc_id: NpcId::new("npc-1"),
            event_type: EventType::Telemetry,
            description: "ping".to_string(),
            urgency: Some(0.1),
        }
    }

    fn profile(p: f64) -> RebellionProfile {
        RebellionProfile {
            probability: p,
            threshold_exceeded: p >= aegis_core::HALT_THRESHOLD,
        }
    }

    #[test]
    fn s7_rebellion_at_or_above_veto_threshold_is_vetoed() {
        let veto = evaluate(
            &event(),
            Tier::Routine,
            &profile(0.82),
            "fine response",
            Duration::from_millis(1),
            &RailsConfig::default(),
        );
        assert!(veto.is_some());
        assert_eq!(veto.unwrap().predicate, "rebellion-veto");
    }

    #[test]
    fn empty_response_fails_coherence() {
        let veto = evaluate(
            &event(),
            Tier::Routine,
            &profile(0.0),
            "   ",
            Duration::from_millis(1),
            &RailsConfig::default(),
        );
        assert_eq!(veto.unwrap().predicate, "coherence");
    }

    #[test]
    fn slow_response_fails_latency_budget() {
        let veto = evaluate(
            &event(),
            Tier::Routine,
            &profile(0.0),
            "fine",
            Duration::from_secs(10),
            &RailsConfig::default(),
        );
        assert_eq!(veto.unwrap().predicate, "latency-budget");
    }

    #[test]
    fn healthy_response_passes_all_rails() {
        let veto = evaluate(
            &event(),
            Tier::Routine,
            &profile(0.1),
            "acknowledged, all systems nominal",
            Duration::from_millis(5),
            &RailsConfig::default(),
        );
        assert!(veto.is_none());
    }
}
