//! Process configuration, read from the environment with sane defaults,
//! reading `PORT` directly via `std::env::var` rather than through a
//! dedicated config crate.

pub struct Config {
    pub port: u16,
    pub recovery_log_path: std::path::PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;
        let recovery_log_path = std::env::var("AEGIS_RECOVERY_LOG")
            .unwrap_or_else(|_| "aegis-recovery.log".to_string())
            .into();
        Ok(Self { port, recovery_log_path })
    }
}
