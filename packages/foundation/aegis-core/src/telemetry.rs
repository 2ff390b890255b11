//! Telemetry events, severities, the outbound envelope shape, and the
//! simulation tick snapshot.

use crate::ids::NpcId;
use crate::time::MeshTimestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
    Catastrophic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    MentalBreakdown {
        npc_id: NpcId,
        severity: Severity,
        detail: String,
    },
    PermanentTrauma {
        npc_id: NpcId,
        severity: Severity,
        trauma_score: f64,
    },
    StateChange {
        npc_id: NpcId,
        severity: Severity,
        field: String,
        previous: f64,
        current: f64,
    },
    Rebellion {
        npc_id: NpcId,
        severity: Severity,
        probability: f64,
    },
    WatchdogRestart {
        severity: Severity,
        service: String,
        reason: String,
    },
    Startup {
        severity: Severity,
        service: String,
    },
    Shutdown {
        severity: Severity,
        service: String,
    },
}

impl TelemetryEvent {
    pub fn severity(&self) -> Severity {
        match self {
            TelemetryEvent::MentalBreakdown { severity, .. }
            | TelemetryEvent::PermanentTrauma { severity, .. }
            | TelemetryEvent::StateChange { severity, .. }
            | TelemetryEvent::Rebellion { severity, .. }
            | TelemetryEvent::WatchdogRestart { severity, .. }
            | TelemetryEvent::Startup { severity, .. }
            | TelemetryEvent::Shutdown { severity, .. } => *severity,
        }
    }
}

/// Wire shape for every outbound channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub channel: String,
    pub data: serde_json::Value,
    pub timestamp: MeshTimestamp,
}

impl Envelope {
    pub fn new(channel: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            channel: channel.into(),
            data,
            timestamp: MeshTimestamp::now(),
        }
    }
}
