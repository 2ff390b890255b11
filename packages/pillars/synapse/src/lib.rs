//! Synapse — the persistent NPC memory graph.
//!
//! Append-only memories, confidence edges with hyperbolic decay, wisdom
//! scoring, and an in-process retry buffer that lets writes survive a
//! backend outage without blocking the caller or losing data.

pub mod confidence;
pub mod decay;
pub mod error;
pub mod graph;
pub mod retry_buffer;
pub mod session_pool;
pub mod storage;
pub mod wisdom;

pub use confidence::{action_confidence_delta, decayed_confidence};
pub use decay::decayed_trauma;
pub use error::SynapseError;
pub use graph::{MemoryGraph, NpcState};
pub use retry_buffer::RetryBuffer;
pub use session_pool::SessionPool;
pub use storage::{InMemoryBackend, StorageBackend};
pub use wisdom::{rebellion_probability_from_memory, wisdom_score};
