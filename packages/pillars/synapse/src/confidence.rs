//! Confidence-edge decay and the action-driven confidence update table.

use aegis_core::PlayerAction;

pub const NEUTRAL: f64 = 0.5;
pub const DEFAULT_CONFIDENCE_ALPHA: f64 = 0.1;

/// Hyperbolic decay toward the neutral anchor `0.5`. Never crosses 0.5:
/// high trust approaches it from above, low trust from below.
pub fn decayed_confidence(raw: f64, hours: f64, alpha: f64) -> f64 {
    let decayed = NEUTRAL + (raw - NEUTRAL) * (1.0 / (1.0 + alpha * hours.max(0.0)));
    decayed.clamp(0.0, 1.0)
}

/// Confidence delta from a player action, scaled by intensity.
pub fn action_confidence_delta(action: PlayerAction, intensity: f64) -> f64 {
    let i = intensity.clamp(0.0, 1.0);
    match action {
        PlayerAction::Reward => 0.10 * i,
        PlayerAction::Punishment => -0.15 * i,
        PlayerAction::Command => -0.05 * i,
        PlayerAction::Dialogue => 0.08 * i,
        PlayerAction::Environment => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_raw_value_never_moves() {
        for h in [0.0, 1.0, 100.0, 10_000.0] {
            assert_eq!(decayed_confidence(0.5, h, 0.1), 0.5);
        }
    }

    #[test]
    fn high_trust_approaches_neutral_from_above() {
        let decayed = decayed_confidence(0.9, 10.0, 0.1);
        assert!(decayed > 0.5 && decayed <= 0.9);
    }

    #[test]
    fn low_trust_approaches_neutral_from_below() {
        let decayed = decayed_confidence(0.1, 10.0, 0.1);
        assert!(decayed < 0.5 && decayed >= 0.1);
    }

    #[test]
    fn s4_confidence_decay_matches_seed_scenario() {
        assert!((decayed_confidence(0.9, 10.0, 0.1) - 0.7).abs() < 0.01);
        assert!((decayed_confidence(0.1, 10.0, 0.1) - 0.3).abs() < 0.01);
        assert_eq!(decayed_confidence(0.5, 10.0, 0.1), 0.5);
    }

    #[test]
    fn reward_increases_confidence_punishment_decreases() {
        assert!(action_confidence_delta(PlayerAction::Reward, 1.0) > 0.0);
        assert!(action_confidence_delta(PlayerAction::Punishment, 1.0) < 0.0);
    }
}
