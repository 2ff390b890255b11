//! Action effect application: per-action deltas to morale,
//! trauma, efficiency, clamped to `[0, 1]` after application.

use aegis_core::{NpcBehavioralState, PlayerAction};

#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDeltas {
    pub morale: f64,
    pub trauma: f64,
    pub efficiency: f64,
}

fn deltas_for(action: PlayerAction, intensity: f64) -> ActionDeltas {
    let i = intensity.clamp(0.0, 1.0);
    match action {
        PlayerAction::Reward => ActionDeltas {
            morale: 0.15 * i,
            trauma: -0.05 * i,
            efficiency: 0.0,
        },
        PlayerAction::Punishment => ActionDeltas {
            morale: -0.20 * i,
            trauma: 0.15 * i,
            efficiency: 0.0,
        },
        PlayerAction::Command => ActionDeltas {
            morale: -0.05 * i,
            trauma: 0.0,
            efficiency: 0.10 * i,
        },
        PlayerAction::Dialogue => ActionDeltas {
            morale: 0.10 * i,
            trauma: 0.0,
            efficiency: 0.0,
        },
        PlayerAction::Environment => ActionDeltas {
            morale: 0.0,
            trauma: 0.10 * i,
            efficiency: 0.0,
        },
    }
}

#[derive(Debug, Clone)]
pub struct ActionResult {
    pub post_state: NpcBehavioralState,
    pub deltas: ActionDeltas,
}

/// Applies `action` to `state`. When `dry_run` is true, returns the
/// post-state and deltas without mutating the caller's copy — since
/// Rust has no implicit aliasing, the caller simply decides whether to
/// persist `post_state` based on `dry_run`.
pub fn apply_action(
    state: &NpcBehavioralState,
    action: PlayerAction,
    intensity: f64,
) -> ActionResult {
    let deltas = deltas_for(action, intensity);

    let post_state = NpcBehavioralState {
        npc_id: state.npc_id.clone(),
        work_efficiency: (state.work_efficiency + deltas.efficiency).clamp(0.0, 1.0),
        morale: (state.morale + deltas.morale).clamp(0.0, 1.0),
        avg_trauma: (state.avg_trauma + deltas.trauma).clamp(0.0, 1.0),
        role: state.role.clone(),
    };

    ActionResult { post_state, deltas }
}

/// Batch application: identical formula per NPC, independently.
pub fn apply_action_batch(
    states: &[NpcBehavioralState],
    action: PlayerAction,
    intensity: f64,
) -> Vec<ActionResult> {
    states.iter().map(|s| apply_action(s, action, intensity)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::NpcId;

    fn state() -> NpcBehavioralState {
        NpcBehavioralState {
            npc_id: NpcId::new("npc-1"),
            work_efficiency: 0.5,
            morale: 0.5,
            avg_trauma: 0.0,
            role: None,
        }
    }

    #[test]
    fn s2_reward_action_matches_seed_scenario() {
        let result = apply_action(&state(), PlayerAction::Reward, 0.8);
        assert!((result.post_state.morale - 0.62).abs() < 1e-9);
        assert_eq!(result.post_state.avg_trauma, 0.0);
    }

    #[test]
    fn effects_clamp_at_boundaries() {
        let mut s = state();
        s.morale = 0.95;
        let result = apply_action(&s, PlayerAction::Reward, 1.0);
        assert!(result.post_state.morale <= 1.0);
    }

    #[test]
    fn punishment_lowers_morale_and_raises_trauma() {
        let result = apply_action(&state(), PlayerAction::Punishment, 1.0);
        assert!(result.post_state.morale < 0.5);
        assert!(result.post_state.avg_trauma > 0.0);
    }

    #[test]
    fn batch_applies_independently_per_npc() {
        let states = vec![state(), state()];
        let results = apply_action_batch(&states, PlayerAction::Dialogue, 1.0);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.post_state.morale > 0.5));
    }
}
