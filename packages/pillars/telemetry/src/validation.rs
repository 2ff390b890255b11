//! Inbound envelope validation: every envelope's payload
//! must match its declared channel shape. Unknown channels and
//! malformed payloads are rejected without crashing the bus.

use crate::command::NpcCommand;
use crate::error::TelemetryError;

/// Validates `data` against `channel`'s declared shape. Channels without
/// a narrow payload contract (e.g. `telemetry`, `system-status`) accept
/// any JSON object; `npc-commands` is schema-checked against
/// `NpcCommand`.
pub fn validate(channel: &str, data: &serde_json::Value) -> Result<(), TelemetryError> {
    if !aegis_core::CHANNELS.contains(&channel) {
        return Err(TelemetryError::UnknownChannel(channel.to_string()));
    }

    if channel == "npc-commands" {
        let command: NpcCommand = serde_json::from_value(data.clone()).map_err(|e| {
            TelemetryError::InvalidEnvelope {
                channel: channel.to_string(),
                reason: e.to_string(),
            }
        })?;
        command.validate()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_channel_is_rejected() {
        assert!(validate("not-a-channel", &json!({})).is_err());
    }

    #[test]
    fn known_open_channel_accepts_any_object() {
        assert!(validate("telemetry", &json!({"anything": 1})).is_ok());
    }

    #[test]
    fn npc_command_schema_is_enforced() {
        let valid = json!({"npcId": "npc-1", "action": "move_to", "priority": 3});
        assert!(validate("npc-commands", &valid).is_ok());

        let bad_priority = json!({"npcId": "npc-1", "action": "move_to", "priority": 99});
        assert!(validate("npc-commands", &bad_priority).is_err());

        let bad_shape = json!({"npcId": "npc-1"});
        assert!(validate("npc-commands", &bad_shape).is_err());
    }
}
