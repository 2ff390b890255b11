//! World-scoped infestation / plague-heart state machine.

use aegis_core::sim::InfestationState;
use aegis_core::{Severity, TelemetryEvent};
use parking_lot::RwLock;

const WARNING_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfestationTransition {
    None,
    EnteredWarning,
    EnteredPlagueHeart,
    Cleansed,
}

pub struct InfestationEngine {
    plague_heart_threshold: f64,
    state: RwLock<InfestationState>,
    warned: RwLock<bool>,
}

impl InfestationEngine {
    pub fn new(plague_heart_threshold: f64) -> Self {
        Self {
            plague_heart_threshold,
            state: RwLock::new(InfestationState::default()),
            warned: RwLock::new(false),
        }
    }

    pub fn snapshot(&self) -> InfestationState {
        self.state.read().clone()
    }

    /// Accumulates `delta` into the infestation counter (driven by
    /// sustained rebellion + trauma elsewhere in the pipeline) and
    /// returns the transition it caused, if any, plus the telemetry
    /// event to emit: a warning once crossing 50, critical once on
    /// Plague Heart entry.
    pub fn accumulate(&self, delta: f64) -> (InfestationTransition, Option<TelemetryEvent>) {
        let mut state = self.state.write();
        state.counter = (state.counter + delta).clamp(0.0, 100.0);

        if state.counter >= self.plague_heart_threshold && !state.is_plague_heart {
            state.is_plague_heart = true;
            state.throttle_multiplier = 0.5;
            return (
                InfestationTransition::EnteredPlagueHeart,
                Some(TelemetryEvent::StateChange {
                    npc_id: aegis_core::NpcId::new("world"),
                    severity: Severity::Critical,
                    field: "infestation".to_string(),
                    previous: state.counter - delta,
                    current: state.counter,
                }),
            );
        }

        if state.counter >= WARNING_THRESHOLD {
            let mut warned = self.warned.write();
            if !*warned {
                *warned = true;
                return (
                    InfestationTransition::EnteredWarning,
                    Some(TelemetryEvent::StateChange {
                        npc_id: aegis_core::NpcId::new("world"),
                        severity: Severity::Warning,
                        field: "infestation".to_string(),
                        previous: state.counter - delta,
                        current: state.counter,
                    }),
                );
            }
        }

        (InfestationTransition::None, None)
    }

    /// Operator-invoked cleanse: clears flags, throttle returns to 1.0.
    pub fn cleanse(&self) -> TelemetryEvent {
        let mut state = self.state.write();
        state.counter = 0.0;
        state.is_plague_heart = false;
        state.throttle_multiplier = 1.0;
        *self.warned.write() = false;

        TelemetryEvent::StateChange {
            npc_id: aegis_core::NpcId::new("world"),
            severity: Severity::Info,
            field: "infestation".to_string(),
            previous: 100.0,
            current: 0.0,
        }
    }
}

impl Default for InfestationEngine {
    fn default() -> Self {
        Self::new(80.0)
    }
}
