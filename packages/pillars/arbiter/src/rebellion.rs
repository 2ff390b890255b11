//! Rebellion probability: a pure function of NPC behavioral state.
//! Distinct from Synapse's memory-derived rebellion value (kept as two
//! separate functions) — this is the one the pipeline vetoes against.

use aegis_core::NpcBehavioralState;

#[derive(Debug, Clone, Copy)]
pub struct RebellionParams {
    pub base: f64,
    pub w_trauma: f64,
    pub w_efficiency: f64,
    pub w_morale: f64,
    pub halt_threshold: f64,
    pub veto_threshold: f64,
}

impl Default for RebellionParams {
    fn default() -> Self {
        Self {
            base: 0.05,
            w_trauma: 0.30,
            w_efficiency: 0.30,
            w_morale: 0.20,
            halt_threshold: aegis_core::HALT_THRESHOLD,
            veto_threshold: aegis_core::VETO_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RebellionResult {
    pub probability: f64,
    pub threshold_exceeded: bool,
    pub halt_triggered: bool,
}

/// `p = clamp(base + avgTrauma*wTrauma + (1-workEff)*wEfficiency + (1-morale)*wMorale, 0, 1)`
pub fn rebellion_probability(state: &NpcBehavioralState, params: &RebellionParams) -> RebellionResult {
    let raw = params.base
        + state.avg_trauma * params.w_trauma
        + (1.0 - state.work_efficiency) * params.w_efficiency
        + (1.0 - state.morale) * params.w_morale;
    let probability = aegis_core::clamp01(raw);
    // Inclusive equality at the halt threshold.
    let threshold_exceeded = probability >= params.halt_threshold;

    RebellionResult {
        probability,
        threshold_exceeded,
        halt_triggered: threshold_exceeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::NpcId;

    fn state(efficiency: f64, morale: f64, trauma: f64) -> NpcBehavioralState {
        NpcBehavioralState {
            npc_id: NpcId::new("npc-1"),
            work_efficiency: efficiency,
            morale,
            avg_trauma: trauma,
            role: None,
        }
    }

    #[test]
    fn s1_default_npc_probability_matches_seed_scenario() {
        let result = rebellion_probability(&state(0.5, 0.5, 0.0), &RebellionParams::default());
        assert!((result.probability - 0.30).abs() < 1e-9);
        assert!(!result.threshold_exceeded);
    }

    #[test]
    fn halt_threshold_is_inclusive() {
        // base=0.05, choose trauma so p lands exactly at 0.35.
        let params = RebellionParams::default();
        let trauma = (params.halt_threshold - params.base - 0.15 - 0.10) / params.w_trauma;
        let result = rebellion_probability(&state(0.5, 0.5, trauma), &params);
        assert!((result.probability - 0.35).abs() < 1e-9);
        assert!(result.threshold_exceeded, "p == halt_threshold must count as exceeded");
    }

    #[test]
    fn probability_is_always_clamped() {
        let result = rebellion_probability(&state(0.0, 0.0, 1.0), &RebellionParams::default());
        assert!((0.0..=1.0).contains(&result.probability));
    }

    #[test]
    fn monotone_increasing_trauma_never_decreases_probability() {
        let params = RebellionParams::default();
        let low = rebellion_probability(&state(0.5, 0.5, 0.1), &params).probability;
        let high = rebellion_probability(&state(0.5, 0.5, 0.9), &params).probability;
        assert!(high >= low);
    }

    #[test]
    fn monotone_decreasing_efficiency_never_decreases_probability() {
        let params = RebellionParams::default();
        let high_eff = rebellion_probability(&state(0.9, 0.5, 0.2), &params).probability;
        let low_eff = rebellion_probability(&state(0.1, 0.5, 0.2), &params).probability;
        assert!(low_eff >= high_eff);
    }

    #[test]
    fn monotone_decreasing_morale_never_decreases_probability() {
        let params = RebellionParams::default();
        let high_morale = rebellion_probability(&state(0.5, 0.9, 0.2), &params).probability;
        let low_morale = rebellion_probability(&state(0.5, 0.1, 0.2), &params).probability;
        assert!(low_morale >= high_morale);
    }
}
