//! Inbound event and tier classification.

use crate::ids::{EventId, NpcId};
use serde::{Deserialize, Serialize};

/// Event kinds the classifier recognizes. `Other` keeps ingestion open to
/// event types not worth a dedicated variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Telemetry,
    NpcQuery,
    ResourceChange,
    Command,
    RebellionAnalysis,
    Other(String),
}

/// Urgency tier assigned by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Routine,
    Operational,
    Strategic,
}

impl Tier {
    /// Per-tier processing deadline that a provider call must complete
    /// within.
    pub fn latency_budget(&self) -> std::time::Duration {
        match self {
            Tier::Routine => std::time::Duration::from_millis(800),
            Tier::Operational => std::time::Duration::from_millis(2_000),
            Tier::Strategic => std::time::Duration::from_millis(5_000),
        }
    }

    pub fn instruction_line(&self) -> &'static str {
        match self {
            Tier::Routine => "respond briefly",
            Tier::Operational => "analyze and recommend",
            Tier::Strategic => "deep analysis — consider rebellion risk",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "eventId")]
    pub event_id: EventId,
    #[serde(rename = "npcId")]
    pub npc_id: NpcId,
    #[serde(rename = "eventType")]
    pub event_type: EventType,
    pub description: String,
    #[serde(default)]
    pub urgency: Option<f64>,
}

impl Event {
    /// Classification: event type + urgency + description heuristics →
    /// tier. Pure and deterministic.
    pub fn classify(&self) -> Tier {
        let urgency = self.urgency.unwrap_or(0.0).clamp(0.0, 1.0);

        let type_floor = match &self.event_type {
            EventType::RebellionAnalysis => Tier::Strategic,
            EventType::Command | EventType::ResourceChange => Tier::Operational,
            EventType::Telemetry | EventType::NpcQuery => Tier::Routine,
            EventType::Other(_) => Tier::Routine,
        };

        let description_escalation = description_signals_escalation(&self.description);

        let urgency_tier = if urgency >= 0.75 {
            Tier::Strategic
        } else if urgency >= 0.35 {
            Tier::Operational
        } else {
            Tier::Routine
        };

        let mut tier = type_floor.max(urgency_tier);
        if description_escalation && tier < Tier::Strategic {
            tier = Tier::Operational.max(tier);
        }
        tier
    }
}

fn description_signals_escalation(description: &str) -> bool {
    let lowered = description.to_lowercase();
    ["rebellion", "uprising", "critical", "emergency", "revolt"]
        .iter()
        .any(|kw| lowered.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: EventType, urgency: Option<f64>, description: &str) -> Event {
        Event {
            event_id: EventId::new("e1"),
            npc_id: NpcId::new("npc-1"),
            event_type,
            description: description.to_string(),
            urgency,
        }
    }

    #[test]
    fn low_urgency_telemetry_is_routine() {
        let e = event(EventType::Telemetry, Some(0.1), "routine status ping");
        assert_eq!(e.classify(), Tier::Routine);
    }

    #[test]
    fn high_urgency_escalates_to_strategic() {
        let e = event(EventType::Telemetry, Some(0.9), "status ping");
        assert_eq!(e.classify(), Tier::Strategic);
    }

    #[test]
    fn rebellion_analysis_is_always_at_least_strategic() {
        let e = event(EventType::RebellionAnalysis, Some(0.0), "check");
        assert_eq!(e.classify(), Tier::Strategic);
    }

    #[test]
    fn description_keyword_escalates_past_routine() {
        let e = event(EventType::Telemetry, Some(0.0), "signs of rebellion detected");
        assert_eq!(e.classify(), Tier::Operational);
    }
}
