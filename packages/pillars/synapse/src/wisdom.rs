//! Wisdom scoring: four weighted factors combined into a
//! single `[0, 1]` score.

use aegis_core::MemoryNode;
use std::collections::HashSet;

const MEMORY_COUNT_SATURATION: f64 = 100.0;
const TEMPORAL_SPAN_CAP_HOURS: f64 = 720.0;
const EVENT_TYPE_CATEGORIES: f64 = 6.0;

const W_COUNT: f64 = 0.25;
const W_DIVERSITY: f64 = 0.25;
const W_SPAN: f64 = 0.25;
const W_POSITIVE_RATIO: f64 = 0.25;

/// `memories` most-recent-first or in any order; only aggregate
/// properties matter.
pub fn wisdom_score(memories: &[MemoryNode]) -> f64 {
    if memories.is_empty() {
        return 0.0;
    }

    let count_factor = (memories.len() as f64).ln_1p() / MEMORY_COUNT_SATURATION.ln_1p();
    let count_factor = count_factor.clamp(0.0, 1.0);

    let distinct_events: HashSet<&str> = memories.iter().map(|m| m.event.as_str()).collect();
    let diversity_factor =
        (distinct_events.len() as f64 / EVENT_TYPE_CATEGORIES.min(memories.len() as f64)).min(1.0);

    let timestamps: Vec<i64> = memories.iter().map(|m| m.timestamp.millis()).collect();
    let span_hours = timestamps
        .iter()
        .max()
        .zip(timestamps.iter().min())
        .map(|(max, min)| (*max - *min) as f64 / 3_600_000.0)
        .unwrap_or(0.0);
    let span_factor = (span_hours / TEMPORAL_SPAN_CAP_HOURS).clamp(0.0, 1.0);

    let positive_count = memories
        .iter()
        .filter(|m| matches!(m.player_action, Some(aegis_core::PlayerAction::Reward | aegis_core::PlayerAction::Dialogue)))
        .count();
    let positive_ratio = positive_count as f64 / memories.len() as f64;

    aegis_core::clamp01(
        count_factor * W_COUNT
            + diversity_factor * W_DIVERSITY
            + span_factor * W_SPAN
            + positive_ratio * W_POSITIVE_RATIO,
    )
}

/// Read-only rebellion derivation from memory state, distinct from the
/// C2 behavior-engine computation.
pub fn rebellion_probability_from_memory(decayed_trauma: f64, decayed_confidence_in_director: f64) -> f64 {
    aegis_core::clamp01(0.05 + 0.6 * decayed_trauma + 0.25 * (1.0 - decayed_confidence_in_director))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_memories_score_zero() {
        assert_eq!(wisdom_score(&[]), 0.0);
    }

    #[test]
    fn rebellion_from_memory_is_bounded() {
        assert!((0.0..=1.0).contains(&rebellion_probability_from_memory(1.0, 0.0)));
        assert!((0.0..=1.0).contains(&rebellion_probability_from_memory(0.0, 1.0)));
    }

    #[test]
    fn rebellion_from_memory_increases_with_trauma() {
        let low = rebellion_probability_from_memory(0.1, 0.5);
        let high = rebellion_probability_from_memory(0.9, 0.5);
        assert!(high > low);
    }
}
