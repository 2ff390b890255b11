//! Prompt assembly: a small, tier-dependent template carrying
//! event metadata and a terse instruction line. No LLM content is
//! prescribed — the three instruction lines are the only scripted text,
//! no prompt-engineering content beyond these three lines is in scope.

use aegis_core::{Event, Tier};

/// Data, not hardcoded prose: the tier chooses which stock instruction
/// line to append, everything else is interpolated event metadata.
#[derive(Debug, Clone)]
pub struct TierPromptTemplate {
    pub tier: Tier,
    pub instruction_line: &'static str,
}

impl TierPromptTemplate {
    pub fn for_tier(tier: Tier) -> Self {
        Self {
            tier,
            instruction_line: tier.instruction_line(),
        }
    }
}

/// Assembles the prompt string passed to the provider client.
pub fn assemble(event: &Event, tier: Tier) -> String {
    let template = TierPromptTemplate::for_tier(tier);
    format!(
        "[{tier:?}] npc={npc} event_type={event_type:?} description={description}\n{instruction}",
        tier = template.tier,
        npc = event.npc_id,
        event_type = event.event_type,
        description = event.description,
        instruction = template.instruction_line,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::{EventId, EventType, NpcId};

    #[test]
    fn assembled_prompt_carries_instruction_line_for_tier() {
        let event = Event {
            event_id: EventId::new("e1"),
            npc_id: NpcId::new("npc-1"),
            event_type: EventType::Telemetry,
            description: "status ping".to_string(),
            urgency: Some(0.1),
        };
        let prompt = assemble(&event, Tier::Strategic);
        assert!(prompt.contains("deep analysis"));
        assert!(prompt.contains("npc-1"));
    }
}
