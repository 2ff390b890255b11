//! Arbiter — the rebellion / behavior engine.
//!
//! Deterministic rebellion probability, action-effect application,
//! and the world-scoped infestation/plague-heart state machine.

pub mod actions;
pub mod cleansing;
pub mod client;
pub mod infestation;
pub mod rebellion;
pub mod registry;

pub use actions::{apply_action, ActionResult};
pub use client::{BehaviorEngineClient, InProcessBehaviorEngineClient, RebellionProfile};
pub use infestation::{InfestationEngine, InfestationTransition};
pub use rebellion::{rebellion_probability, RebellionParams};
pub use registry::BehaviorRegistry;
