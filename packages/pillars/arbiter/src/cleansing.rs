//! Cleansing operation: participant-aggregated dice roll against the
//! infestation state.

use aegis_core::{NpcId, Severity, TelemetryEvent};
use rand::Rng;

#[derive(Debug, Clone, Copy, Default)]
pub struct CleansingParams {
    pub base: f64,
    pub w_morale: f64,
    pub w_trauma_penalty: f64,
    pub w_confidence: f64,
}

impl CleansingParams {
    pub fn defaults() -> Self {
        Self {
            base: 0.10,
            w_morale: 0.40,
            w_trauma_penalty: 0.30,
            w_confidence: 0.30,
        }
    }
}

pub struct CleansingOutcome {
    pub success: bool,
    pub success_rate: f64,
    pub telemetry: TelemetryEvent,
}

/// `successRate = clamp(base + avgMorale*wMorale - avgTrauma*wTraumaPenalty + avgConfidence*wConfidence, 0, 1)`.
/// A single roll decides the outcome; on failure, participants incur a
/// survivor's-guilt trauma increment (returned to the caller to apply
/// via the behavior engine, keeping this module free of storage
/// concerns).
pub fn attempt_cleansing(
    avg_morale: f64,
    avg_trauma: f64,
    avg_confidence: f64,
    params: &CleansingParams,
    participants: &[NpcId],
) -> (CleansingOutcome, Option<f64>) {
    let success_rate = aegis_core::clamp01(
        params.base + avg_morale * params.w_morale - avg_trauma * params.w_trauma_penalty
            + avg_confidence * params.w_confidence,
    );

    let roll: f64 = rand::rng().random();
    let success = roll < success_rate;

    let telemetry = TelemetryEvent::StateChange {
        npc_id: participants.first().cloned().unwrap_or_else(|| NpcId::new("world")),
        severity: if success { Severity::Info } else { Severity::Warning },
        field: "cleansing_result".to_string(),
        previous: success_rate,
        current: if success { 1.0 } else { 0.0 },
    };

    // Survivor's-guilt trauma increment on failure, none on success.
    const SURVIVORS_GUILT_TRAUMA: f64 = 0.10;
    let trauma_increment = if success { None } else { Some(SURVIVORS_GUILT_TRAUMA) };

    (
        CleansingOutcome {
            success,
            success_rate,
            telemetry,
        },
        trauma_increment,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_is_clamped() {
        let params = CleansingParams::defaults();
        let (outcome, _) = attempt_cleansing(1.0, 0.0, 1.0, &params, &[]);
        assert!((0.0..=1.0).contains(&outcome.success_rate));
        let (outcome, _) = attempt_cleansing(0.0, 1.0, 0.0, &params, &[]);
        assert!((0.0..=1.0).contains(&outcome.success_rate));
    }

    #[test]
    fn failure_yields_trauma_increment_success_does_not() {
        let params = CleansingParams::defaults();
        // Force near-certain failure: low morale, high trauma, low confidence.
        let (outcome, increment) = attempt_cleansing(0.0, 1.0, 0.0, &params, &[]);
        if !outcome.success {
            assert!(increment.is_some());
        } else {
            assert!(increment.is_none());
        }
    }
}
