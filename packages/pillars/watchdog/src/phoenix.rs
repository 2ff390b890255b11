//! Phoenix recovery: diagnose, drain, restart in dependency order,
//! verify, log. Triggered by the "≥3 services down" rule, by the retry
//! buffer nearing capacity with the backend unreachable, or by an
//! accelerating failure velocity, whichever fires first.

use std::sync::Arc;

use aegis_synapse::{RetryBuffer, StorageBackend};
use async_trait::async_trait;

use crate::recovery_log::RecoveryLog;
use crate::velocity::FailureVelocity;

/// Default dependency order for phase (c): backend DB, then behavior
/// engine, then orchestration, then clients.
pub const DEFAULT_RESTART_ORDER: &[&str] = &["backend", "behavior-engine", "orchestration", "clients"];

#[derive(Debug, Clone)]
pub struct ServiceHealth {
    pub name: String,
    pub healthy: bool,
}

/// The seam a deployment wires to its process manager or container
/// orchestrator to actually restart a named service.
#[async_trait]
pub trait RestartExecutor: Send + Sync {
    async fn restart(&self, service: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Default)]
pub struct PhoenixReport {
    pub drained: bool,
    pub restarted: Vec<String>,
    pub failed: Vec<String>,
}

pub struct PhoenixRecovery {
    retry_buffer: Arc<RetryBuffer>,
    backend: Arc<dyn StorageBackend>,
    executor: Arc<dyn RestartExecutor>,
    log: Arc<RecoveryLog>,
    restart_order: Vec<String>,
}

impl PhoenixRecovery {
    pub fn new(
        retry_buffer: Arc<RetryBuffer>,
        backend: Arc<dyn StorageBackend>,
        executor: Arc<dyn RestartExecutor>,
        log: Arc<RecoveryLog>,
    ) -> Self {
        Self {
            retry_buffer,
            backend,
            executor,
            log,
            restart_order: DEFAULT_RESTART_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether recovery should fire given current service statuses, the
    /// retry buffer's fill level against `retry_capacity`, and the
    /// rolling failure velocity.
    pub fn should_trigger(
        statuses: &[ServiceHealth],
        retry_buffer_size: usize,
        retry_capacity: usize,
        backend_reachable: bool,
        velocity: &FailureVelocity,
    ) -> bool {
        let down_count = statuses.iter().filter(|s| !s.healthy).count();
        let near_capacity_unreachable =
            retry_buffer_size as f64 >= 0.9 * retry_capacity as f64 && !backend_reachable;
        down_count >= 3 || near_capacity_unreachable || velocity.is_accelerating()
    }

    /// Runs the five recovery phases in order.
    pub async fn recover(&self, statuses: &[ServiceHealth]) -> PhoenixReport {
        let down = statuses.iter().filter(|s| !s.healthy).count();
        self.log.append(
            "diagnose",
            format!("{down} of {} services reporting unhealthy", statuses.len()),
        );

        let drained = if self.backend.is_reachable() {
            self.retry_buffer.flush(self.backend.as_ref()).await;
            self.log.append("drain", "retry buffer flushed through available backend");
            true
        } else {
            self.log.append(
                "drain",
                "backend unreachable; drain skipped per safety invariant, operations remain queued",
            );
            false
        };

        let mut restarted = Vec::new();
        let mut failed = Vec::new();
        for service in &self.restart_order {
            match self.executor.restart(service).await {
                Ok(()) => {
                    self.log.append("restart", format!("{service} restarted"));
                    restarted.push(service.clone());
                }
                Err(reason) => {
                    self.log.append("restart", format!("{service} restart failed: {reason}"));
                    failed.push(service.clone());
                }
            }
        }

        self.log.append(
            "verify",
            format!("{} restarted cleanly, {} failed", restarted.len(), failed.len()),
        );

        PhoenixReport {
            drained,
            restarted,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_synapse::InMemoryBackend;
    use std::time::Duration;

    struct AlwaysSucceeds;

    #[async_trait]
    impl RestartExecutor for AlwaysSucceeds {
        async fn restart(&self, _service: &str) -> Result<(), String> {
            Ok(())
        }
    }

    fn log() -> Arc<RecoveryLog> {
        let dir = std::env::temp_dir().join(format!("aegis-phoenix-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Arc::new(RecoveryLog::new(dir.join("recovery.log")))
    }

    #[test]
    fn three_down_services_trigger_recovery() {
        let statuses = vec![
            ServiceHealth { name: "a".into(), healthy: false },
            ServiceHealth { name: "b".into(), healthy: false },
            ServiceHealth { name: "c".into(), healthy: false },
        ];
        let velocity = FailureVelocity::new(60, 100.0);
        assert!(PhoenixRecovery::should_trigger(&statuses, 0, 1000, true, &velocity));
    }

    #[test]
    fn two_down_services_alone_do_not_trigger() {
        let statuses = vec![
            ServiceHealth { name: "a".into(), healthy: false },
            ServiceHealth { name: "b".into(), healthy: false },
        ];
        let velocity = FailureVelocity::new(60, 100.0);
        assert!(!PhoenixRecovery::should_trigger(&statuses, 0, 1000, true, &velocity));
    }

    #[test]
    fn retry_buffer_near_capacity_with_unreachable_backend_triggers() {
        let velocity = FailureVelocity::new(60, 100.0);
        assert!(PhoenixRecovery::should_trigger(&[], 950, 1000, false, &velocity));
    }

    #[tokio::test]
    async fn drain_is_skipped_when_backend_unreachable() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.set_reachable(false);
        let retry_buffer = Arc::new(RetryBuffer::new(10, Duration::from_secs(300)));
        let recovery = PhoenixRecovery::new(retry_buffer, backend, Arc::new(AlwaysSucceeds), log());

        let report = recovery.recover(&[]).await;
        assert!(!report.drained);
        assert_eq!(report.restarted.len(), DEFAULT_RESTART_ORDER.len());
    }

    #[tokio::test]
    async fn restart_runs_in_dependency_order() {
        let backend = Arc::new(InMemoryBackend::new());
        let retry_buffer = Arc::new(RetryBuffer::new(10, Duration::from_secs(300)));
        let recovery = PhoenixRecovery::new(retry_buffer, backend, Arc::new(AlwaysSucceeds), log());

        let report = recovery.recover(&[]).await;
        assert_eq!(report.restarted, DEFAULT_RESTART_ORDER.to_vec());
    }
}
