//! Shared wire and domain types for the Aegis mesh, plus the mesh-wide
//! error taxonomy. Every pillar crate depends on this one instead of
//! redefining these shapes locally.

pub mod error;
pub mod event;
pub mod ids;
pub mod memory;
pub mod npc;
pub mod provider;
pub mod sim;
pub mod telemetry;
pub mod time;

pub use error::MeshError;
pub use event::{Event, EventType, Tier};
pub use ids::{EntityId, EventId, MemoryId, NpcId, ProviderId};
pub use memory::{ConfidenceEdge, MemoryNode, PlayerAction, QueuedOperation};
pub use npc::NpcBehavioralState;
pub use provider::{CircuitState, ModelDescriptor, ProviderDescriptor};
pub use sim::SimulationTickSnapshot;
pub use telemetry::{Envelope, Severity, TelemetryEvent};
pub use time::MeshTimestamp;

/// Channels the telemetry bus serves. A closed set, not user-extensible.
pub const CHANNELS: &[&str] = &[
    "npc-events",
    "rebellion-alerts",
    "simulation-ticks",
    "telemetry",
    "system-status",
    "npc-commands",
    "cognitive-rails",
];

/// Rebellion probability thresholds shared across exporters and rails.
pub const HALT_THRESHOLD: f64 = 0.35;
pub const VETO_THRESHOLD: f64 = 0.80;

/// Clamp a probability-like float into `[0.0, 1.0]`.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
