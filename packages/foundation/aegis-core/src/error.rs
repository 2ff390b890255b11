//! Mesh-wide error taxonomy.
//!
//! Every variant carries a machine-readable code, a one-line reason, and
//! a timestamp. `Veto` is included in the enum for uniform transport but
//! is not an error in the HTTP sense — pipeline code constructs it
//! inside a success response, never as an `Err(MeshError::Veto(..))`.

use crate::time::MeshTimestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum MeshError {
    #[error("invalid input: {reason}")]
    InvalidInput {
        reason: String,
        #[serde(default)]
        timestamp: MeshTimestamp,
    },

    #[error("circuit open: {reason}")]
    CircuitOpen {
        reason: String,
        #[serde(default)]
        timestamp: MeshTimestamp,
    },

    #[error("backend unavailable: {reason}")]
    BackendUnavailable {
        reason: String,
        #[serde(default)]
        timestamp: MeshTimestamp,
    },

    /// Not an error in the Rust sense — carried here only so the taxonomy
    /// is a single closed type; never constructed as an `Err`.
    #[error("vetoed: {reason}")]
    Veto {
        reason: String,
        #[serde(default)]
        timestamp: MeshTimestamp,
    },

    #[error("timeout: {reason}")]
    Timeout {
        reason: String,
        #[serde(default)]
        timestamp: MeshTimestamp,
    },

    #[error("restart budget exhausted: {reason}")]
    BudgetExhausted {
        reason: String,
        #[serde(default)]
        timestamp: MeshTimestamp,
    },

    #[error("internal error: {reason}")]
    Internal {
        reason: String,
        #[serde(default)]
        timestamp: MeshTimestamp,
    },
}

impl MeshError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
            timestamp: MeshTimestamp::now(),
        }
    }

    pub fn circuit_open(reason: impl Into<String>) -> Self {
        Self::CircuitOpen {
            reason: reason.into(),
            timestamp: MeshTimestamp::now(),
        }
    }

    pub fn backend_unavailable(reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            reason: reason.into(),
            timestamp: MeshTimestamp::now(),
        }
    }

    pub fn veto(reason: impl Into<String>) -> Self {
        Self::Veto {
            reason: reason.into(),
            timestamp: MeshTimestamp::now(),
        }
    }

    pub fn timeout(reason: impl Into<String>) -> Self {
        Self::Timeout {
            reason: reason.into(),
            timestamp: MeshTimestamp::now(),
        }
    }

    pub fn budget_exhausted(reason: impl Into<String>) -> Self {
        Self::BudgetExhausted {
            reason: reason.into(),
            timestamp: MeshTimestamp::now(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
            timestamp: MeshTimestamp::now(),
        }
    }

    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            MeshError::InvalidInput { .. } => "InvalidInput",
            MeshError::CircuitOpen { .. } => "Circuit-Open",
            MeshError::BackendUnavailable { .. } => "Backend-Unavailable",
            MeshError::Veto { .. } => "Veto",
            MeshError::Timeout { .. } => "Timeout",
            MeshError::BudgetExhausted { .. } => "BudgetExhausted",
            MeshError::Internal { .. } => "Internal",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            MeshError::InvalidInput { reason, .. }
            | MeshError::CircuitOpen { reason, .. }
            | MeshError::BackendUnavailable { reason, .. }
            | MeshError::Veto { reason, .. }
            | MeshError::Timeout { reason, .. }
            | MeshError::BudgetExhausted { reason, .. }
            | MeshError::Internal { reason, .. } => reason,
        }
    }

    pub fn timestamp(&self) -> MeshTimestamp {
        match self {
            MeshError::InvalidInput { timestamp, .. }
            | MeshError::CircuitOpen { timestamp, .. }
            | MeshError::BackendUnavailable { timestamp, .. }
            | MeshError::Veto { timestamp, .. }
            | MeshError::Timeout { timestamp, .. }
            | MeshError::BudgetExhausted { timestamp, .. }
            | MeshError::Internal { timestamp, .. } => *timestamp,
        }
    }

    /// Contractual HTTP status for this variant.
    pub fn status_code(&self) -> u16 {
        match self {
            MeshError::InvalidInput { .. } => 400,
            MeshError::CircuitOpen { .. } => 503,
            MeshError::BackendUnavailable { .. } => 503,
            MeshError::Veto { .. } => 200,
            MeshError::Timeout { .. } => 504,
            MeshError::BudgetExhausted { .. } => 503,
            MeshError::Internal { .. } => 500,
        }
    }
}
