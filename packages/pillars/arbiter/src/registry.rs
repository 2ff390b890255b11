//! World-scoped registry of NPC behavioral state, backing both the
//! rebellion-check RPC surface and the HTTP action-application
//! endpoints.

use aegis_core::{NpcBehavioralState, NpcId, PlayerAction};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::actions::{apply_action, ActionResult};
use crate::rebellion::{rebellion_probability, RebellionParams, RebellionResult};

pub struct BehaviorRegistry {
    states: RwLock<HashMap<NpcId, NpcBehavioralState>>,
    params: RebellionParams,
}

impl BehaviorRegistry {
    pub fn new(params: RebellionParams) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            params,
        }
    }

    fn get_or_create(&self, npc_id: &NpcId) -> NpcBehavioralState {
        let mut states = self.states.write();
        states
            .entry(npc_id.clone())
            .or_insert_with(|| NpcBehavioralState::new(npc_id.clone()))
            .clone()
    }

    pub fn rebellion_probability(&self, npc_id: &NpcId) -> RebellionResult {
        let state = self.get_or_create(npc_id);
        rebellion_probability(&state, &self.params)
    }

    pub fn apply(&self, npc_id: &NpcId, action: PlayerAction, intensity: f64, dry_run: bool) -> ActionResult {
        let state = self.get_or_create(npc_id);
        let result = apply_action(&state, action, intensity);
        if !dry_run {
            self.states.write().insert(npc_id.clone(), result.post_state.clone());
        }
        result
    }

    pub fn state_of(&self, npc_id: &NpcId) -> NpcBehavioralState {
        self.get_or_create(npc_id)
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new(RebellionParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_does_not_mutate_stored_state() {
        let registry = BehaviorRegistry::default();
        let npc_id = NpcId::new("npc-1");
        let before = registry.state_of(&npc_id);
        registry.apply(&npc_id, PlayerAction::Reward, 1.0, true);
        let after = registry.state_of(&npc_id);
        assert_eq!(before.morale, after.morale);
    }

    #[test]
    fn non_dry_run_persists_new_state() {
        let registry = BehaviorRegistry::default();
        let npc_id = NpcId::new("npc-1");
        registry.apply(&npc_id, PlayerAction::Reward, 1.0, false);
        let after = registry.state_of(&npc_id);
        assert!(after.morale > 0.5);
    }
}
