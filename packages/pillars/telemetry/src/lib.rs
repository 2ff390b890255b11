//! Aegis Telemetry: the mesh's streaming event bus (C4).
//!
//! Every subsystem publishes onto a shared, validated, multiplexed
//! channel set (`aegis_core::CHANNELS`); external engines subscribe by
//! channel name or wildcard and receive either a live feed or, via
//! [`exporter::ExporterRegistry`], an engine-shaped transformation of
//! each envelope.

pub mod bus;
pub mod command;
pub mod error;
pub mod exporter;
pub mod validation;

pub use aegis_core::Envelope;
pub use bus::{Bus, Subscription, DEFAULT_RECONNECT_INTERVAL_MS, DEFAULT_RETENTION, DEFAULT_SUBSCRIBER_BUFFER};
pub use command::{CommandAction, NpcCommand};
pub use error::TelemetryError;
pub use exporter::{
    ExportError, Exporter, ExporterRegistry, SignalNodePropertyExporter, StructBlackboardExporter,
};
