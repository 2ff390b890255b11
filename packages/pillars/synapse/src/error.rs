//! Synapse-local error type, converted to `aegis_core::MeshError` at the
//! pipeline boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynapseError {
    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),
    #[error("session pool exhausted")]
    SessionPoolExhausted,
    #[error("unknown npc: {0}")]
    UnknownNpc(String),
}

impl From<SynapseError> for aegis_core::MeshError {
    fn from(err: SynapseError) -> Self {
        aegis_core::MeshError::backend_unavailable(err.to_string())
    }
}
