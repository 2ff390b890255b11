use thiserror::Error;

#[derive(Debug, Error)]
pub enum NexusError {
    #[error("circuit open for provider {provider}")]
    CircuitOpen { provider: String },
    #[error("no provider available for tier")]
    NoProviderAvailable,
    #[error("provider call timed out")]
    Timeout,
    #[error("provider call failed: {0}")]
    ProviderFailure(String),
}

impl From<NexusError> for aegis_core::MeshError {
    fn from(err: NexusError) -> Self {
        match err {
            NexusError::CircuitOpen { provider } => {
                aegis_core::MeshError::circuit_open(format!("provider {provider} circuit open"))
            }
            NexusError::NoProviderAvailable => {
                aegis_core::MeshError::circuit_open("no provider available")
            }
            NexusError::Timeout => aegis_core::MeshError::timeout("provider call timed out"),
            NexusError::ProviderFailure(reason) => aegis_core::MeshError::internal(reason),
        }
    }
}
