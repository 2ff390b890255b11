//! Nexus — provider transport: circuit breakers, provider routing, and
//! a resilient client wrapping timeouts and breaker feedback.

pub mod breaker;
pub mod client;
pub mod error;
pub mod registry;
pub mod router;

pub use breaker::{BreakerConfig, CircuitBreaker};
pub use client::{ProviderResponse, ResilientProviderClient};
pub use error::NexusError;
pub use registry::ProviderRegistry;
pub use router::{route, RoutingDecision};
