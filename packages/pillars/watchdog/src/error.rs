use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchdogError {
    #[error("restart budget exhausted for service {service} ({used}/{max} within {window_secs}s)")]
    BudgetExhausted {
        service: String,
        used: u32,
        max: u32,
        window_secs: i64,
    },
    #[error("service {0} is not registered with the watchdog")]
    UnknownService(String),
}

impl From<WatchdogError> for aegis_core::MeshError {
    fn from(err: WatchdogError) -> Self {
        match err {
            WatchdogError::BudgetExhausted { .. } => aegis_core::MeshError::budget_exhausted(err.to_string()),
            WatchdogError::UnknownService(_) => aegis_core::MeshError::invalid_input(err.to_string()),
        }
    }
}
