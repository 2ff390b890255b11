//! Four-layer liveness probing per supervised service:
//! port liveness, PID existence, a debounced health endpoint, and an
//! RSS memory ceiling. `ServiceProbe` is the seam a real deployment
//! wires to its process manager; `ProcessProbe` is the reference
//! implementation, reading `/proc` the way any Linux-hosted supervisor
//! would.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy,
    Unhealthy,
}

/// One supervised service's full probe surface. A production
/// implementation owns the process handle; tests and the default
/// in-process deployment use `ProcessProbe` against `/proc` and a TCP
/// port, with an injectable override for deterministic outcomes.
#[async_trait]
pub trait ServiceProbe: Send + Sync {
    fn name(&self) -> &str;

    /// Check-0: wrapper alive, child dead. ~3s detection target.
    async fn port_alive(&self) -> bool;

    /// Check-1: process existence.
    fn pid_alive(&self) -> bool;

    /// Check-2: the service's own health endpoint, already debounced by
    /// the caller (three consecutive failures at 30s cadence).
    async fn health_endpoint_ok(&self) -> bool;

    /// Current resident set size in bytes, if obtainable.
    fn rss_bytes(&self) -> Option<u64>;
}

/// Reference probe: TCP connect for port liveness, `/proc/<pid>`
/// existence for PID liveness, `/proc/<pid>/status` `VmRSS` for RSS. No
/// external crate is needed for any of these on a Linux host.
pub struct ProcessProbe {
    name: String,
    pid: u32,
    port: u16,
    health_check: Box<dyn Fn() -> bool + Send + Sync>,
}

impl ProcessProbe {
    pub fn new(name: impl Into<String>, pid: u32, port: u16) -> Self {
        Self {
            name: name.into(),
            pid,
            port,
            health_check: Box::new(|| true),
        }
    }

    pub fn with_health_check(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.health_check = Box::new(check);
        self
    }
}

#[async_trait]
impl ServiceProbe for ProcessProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn port_alive(&self) -> bool {
        tokio::time::timeout(
            Duration::from_secs(1),
            TcpStream::connect(("127.0.0.1", self.port)),
        )
        .await
        .map(|result| result.is_ok())
        .unwrap_or(false)
    }

    fn pid_alive(&self) -> bool {
        std::path::Path::new(&format!("/proc/{}", self.pid)).exists()
    }

    async fn health_endpoint_ok(&self) -> bool {
        (self.health_check)()
    }

    fn rss_bytes(&self) -> Option<u64> {
        let status = std::fs::read_to_string(format!("/proc/{}/status", self.pid)).ok()?;
        status.lines().find_map(|line| {
            let rest = line.strip_prefix("VmRSS:")?;
            let kb: u64 = rest.trim().trim_end_matches(" kB").trim().parse().ok()?;
            Some(kb * 1024)
        })
    }
}

/// Debounces the health endpoint: a service is only unhealthy after
/// `consecutive_failures_required` straight failures at the configured
/// cadence.
pub struct HealthDebouncer {
    consecutive_failures: u32,
    consecutive_failures_required: u32,
}

impl HealthDebouncer {
    pub fn new(consecutive_failures_required: u32) -> Self {
        Self {
            consecutive_failures: 0,
            consecutive_failures_required,
        }
    }

    /// Feeds one probe result; returns the debounced outcome.
    pub fn record(&mut self, healthy: bool) -> ProbeOutcome {
        if healthy {
            self.consecutive_failures = 0;
            ProbeOutcome::Healthy
        } else {
            self.consecutive_failures += 1;
            if self.consecutive_failures >= self.consecutive_failures_required {
                ProbeOutcome::Unhealthy
            } else {
                ProbeOutcome::Healthy
            }
        }
    }
}

impl Default for HealthDebouncer {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Sustained-window RSS ceiling: the threshold must be exceeded for
/// `sustained_checks_required` consecutive samples before it forces a
/// restart rather than reacting to a single transient spike.
pub struct RssCeiling {
    cap_bytes: u64,
    sustained_checks_required: u32,
    consecutive_over: u32,
}

impl RssCeiling {
    pub fn new(cap_bytes: u64, sustained_checks_required: u32) -> Self {
        Self {
            cap_bytes,
            sustained_checks_required,
            consecutive_over: 0,
        }
    }

    pub fn record(&mut self, rss_bytes: Option<u64>) -> bool {
        match rss_bytes {
            Some(rss) if rss > self.cap_bytes => {
                self.consecutive_over += 1;
                self.consecutive_over >= self.sustained_checks_required
            }
            _ => {
                self.consecutive_over = 0;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_debouncer_requires_three_consecutive_failures() {
        let mut debouncer = HealthDebouncer::default();
        assert_eq!(debouncer.record(false), ProbeOutcome::Healthy);
        assert_eq!(debouncer.record(false), ProbeOutcome::Healthy);
        assert_eq!(debouncer.record(false), ProbeOutcome::Unhealthy);
    }

    #[test]
    fn health_debouncer_resets_on_success() {
        let mut debouncer = HealthDebouncer::default();
        debouncer.record(false);
        debouncer.record(false);
        assert_eq!(debouncer.record(true), ProbeOutcome::Healthy);
        assert_eq!(debouncer.record(false), ProbeOutcome::Healthy);
    }

    #[test]
    fn rss_ceiling_requires_sustained_overage() {
        let mut ceiling = RssCeiling::new(1024, 2);
        assert!(!ceiling.record(Some(2048)));
        assert!(ceiling.record(Some(2048)));
    }

    #[test]
    fn rss_ceiling_resets_below_cap() {
        let mut ceiling = RssCeiling::new(1024, 2);
        ceiling.record(Some(2048));
        assert!(!ceiling.record(Some(512)));
    }
}
