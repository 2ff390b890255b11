//! Aegis Gate: the cognitive pipeline (C3) — classification, provider
//! routing and invocation, rebellion-aware cognitive rails, telemetry
//! broadcast, and a bounded audit ledger. Sits between inbound `Event`s
//! and the providers/behavior-engine/telemetry-bus seams owned by
//! `aegis-nexus`, `aegis-arbiter`, and `aegis-telemetry` respectively.

pub mod audit;
pub mod pipeline;
pub mod prompt;
pub mod rails;

pub use audit::{AuditEntry, AuditLog, AuditResult, AuditStats};
pub use pipeline::{MeshResponse, Pipeline, PipelineOutcome};
pub use rails::{RailsConfig, Veto};
