//! NPC-command channel schema: server→client navigation and
//! action commands. The server never computes engine-side navigation —
//! it only validates shape and priority and hands the command to the
//! engine to execute.

use aegis_core::NpcId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    MoveTo,
    Stop,
    LookAt,
    PlayMontage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcCommand {
    #[serde(rename = "npcId")]
    pub npc_id: NpcId,
    pub action: CommandAction,
    #[serde(default)]
    pub target: Option<serde_json::Value>,
    pub priority: u8,
}

impl NpcCommand {
    pub fn validate(&self) -> Result<(), crate::error::TelemetryError> {
        if self.priority > 10 {
            return Err(crate::error::TelemetryError::InvalidEnvelope {
                channel: "npc-commands".to_string(),
                reason: format!("priority {} out of range [0,10]", self.priority),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_within_range_is_valid() {
        let cmd = NpcCommand {
            npc_id: NpcId::new("npc-1"),
            action: CommandAction::MoveTo,
            target: None,
            priority: 5,
        };
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn priority_above_ten_is_rejected() {
        let cmd = NpcCommand {
            npc_id: NpcId::new("npc-1"),
            action: CommandAction::Stop,
            target: None,
            priority: 11,
        };
        assert!(cmd.validate().is_err());
    }
}
