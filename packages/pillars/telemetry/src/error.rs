use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
    #[error("envelope validation failed for channel {channel}: {reason}")]
    InvalidEnvelope { channel: String, reason: String },
}

impl From<TelemetryError> for aegis_core::MeshError {
    fn from(err: TelemetryError) -> Self {
        aegis_core::MeshError::invalid_input(err.to_string())
    }
}
