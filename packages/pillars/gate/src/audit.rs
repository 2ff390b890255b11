//! Bounded in-memory audit ring buffer: append-only, with aggregate
//! statistics computed from a snapshot read.

use aegis_core::{MeshTimestamp, Tier};
use parking_lot::RwLock;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    Accepted,
    Vetoed,
    Error,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditEntry {
    pub tier: Tier,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub latency_ms: u64,
    pub cost: f64,
    pub failover: Option<bool>,
    pub result: AuditResult,
    pub timestamp: MeshTimestamp,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AuditStats {
    pub total_decisions: u64,
    pub total_accepted: u64,
    pub total_vetoed: u64,
    pub total_errors: u64,
    pub avg_latency_ms: f64,
    pub total_cost: f64,
}

pub struct AuditLog {
    capacity: usize,
    entries: RwLock<VecDeque<AuditEntry>>,
}

impl AuditLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn append(&self, entry: AuditEntry) {
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Most-recent-first, bounded by `limit` (capped at `DEFAULT_CAPACITY`).
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        let limit = limit.min(DEFAULT_CAPACITY);
        self.entries.read().iter().rev().take(limit).cloned().collect()
    }

    pub fn stats(&self) -> AuditStats {
        let entries = self.entries.read();
        let mut stats = AuditStats::default();
        stats.total_decisions = entries.len() as u64;
        let mut latency_sum = 0u64;
        for entry in entries.iter() {
            match entry.result {
                AuditResult::Accepted => stats.total_accepted += 1,
                AuditResult::Vetoed => stats.total_vetoed += 1,
                AuditResult::Error => stats.total_errors += 1,
            }
            latency_sum += entry.latency_ms;
            stats.total_cost += entry.cost;
        }
        if !entries.is_empty() {
            stats.avg_latency_ms = latency_sum as f64 / entries.len() as f64;
        }
        stats
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(result: AuditResult) -> AuditEntry {
        AuditEntry {
            tier: Tier::Routine,
            provider: Some("p".to_string()),
            model: Some("m".to_string()),
            latency_ms: 10,
            cost: 0.01,
            failover: Some(false),
            result,
            timestamp: MeshTimestamp::now(),
        }
    }

    #[test]
    fn capacity_evicts_oldest() {
        let log = AuditLog::new(2);
        log.append(entry(AuditResult::Accepted));
        log.append(entry(AuditResult::Vetoed));
        log.append(entry(AuditResult::Error));
        assert_eq!(log.recent(10).len(), 2);
    }

    #[test]
    fn stats_total_decisions_covers_processed_events() {
        let log = AuditLog::default();
        log.append(entry(AuditResult::Accepted));
        log.append(entry(AuditResult::Accepted));
        log.append(entry(AuditResult::Vetoed));
        let stats = log.stats();
        assert_eq!(stats.total_decisions, 3);
        assert_eq!(stats.total_accepted, 2);
        assert_eq!(stats.total_vetoed, 1);
        assert!(stats.total_decisions >= 2, "audit covers every processed event");
    }
}
