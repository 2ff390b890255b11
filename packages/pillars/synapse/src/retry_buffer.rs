//! Bounded retry buffer surviving backend outages without data loss:
//! a FIFO ring, oldest-evicted at capacity, age-based
//! expiry, and a flush routine that stops on first failure and resumes
//! next cycle.

use aegis_core::QueuedOperation;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::storage::StorageBackend;

pub const DEFAULT_CAPACITY: usize = 1000;
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);
pub const DEFAULT_AUTO_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
pub struct RetryBufferStats {
    pub total_enqueued: u64,
    pub total_flushed: u64,
    pub total_dropped: u64,
}

pub struct RetryBuffer {
    capacity: usize,
    max_age: Duration,
    queue: RwLock<VecDeque<QueuedOperation>>,
    enqueued: AtomicU64,
    flushed: AtomicU64,
    dropped: AtomicU64,
}

impl RetryBuffer {
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            capacity,
            max_age,
            queue: RwLock::new(VecDeque::with_capacity(capacity)),
            enqueued: AtomicU64::new(0),
            flushed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn size(&self) -> usize {
        self.queue.read().len()
    }

    pub fn stats(&self) -> RetryBufferStats {
        RetryBufferStats {
            total_enqueued: self.enqueued.load(Ordering::Relaxed),
            total_flushed: self.flushed.load(Ordering::Relaxed),
            total_dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    /// Evict oldest on full (FIFO). Tracks totals.
    pub fn enqueue(&self, op: QueuedOperation) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        let mut queue = self.queue.write();
        if queue.len() >= self.capacity {
            queue.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        queue.push_back(op);
    }

    /// Discard expired ops without attempting them.
    pub fn drain_valid(&self) {
        let now = aegis_core::MeshTimestamp::now();
        let max_age = self.max_age;
        self.queue.write().retain(|op| {
            let age_ms = now.millis() - op.enqueued_at.millis();
            (age_ms as u64) < max_age.as_millis() as u64
        });
    }

    /// Drain oldest-first. On per-op failure, stop flushing this cycle
    /// and re-enqueue the failed op at the front so it is retried next
    /// cycle ahead of newer operations.
    pub async fn flush(&self, backend: &dyn StorageBackend) {
        self.drain_valid();

        loop {
            let next = self.queue.write().pop_front();
            let Some(op) = next else { break };

            match backend.execute(&op.query, op.params.clone()).await {
                Ok(()) => {
                    self.flushed.fetch_add(1, Ordering::Relaxed);
                }
                Err(_) => {
                    self.queue.write().push_front(op);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op() -> QueuedOperation {
        QueuedOperation {
            query: "noop".to_string(),
            params: json!({}),
            enqueued_at: aegis_core::MeshTimestamp::now(),
        }
    }

    #[test]
    fn s5_overflow_evicts_oldest_and_tracks_drops() {
        let buffer = RetryBuffer::new(1000, DEFAULT_MAX_AGE);
        for _ in 0..1100 {
            buffer.enqueue(op());
        }
        assert_eq!(buffer.size(), 1000);
        assert_eq!(buffer.stats().total_dropped, 100);
    }

    #[tokio::test]
    async fn flush_preserves_fifo_when_backend_healthy() {
        let backend = crate::storage::InMemoryBackend::new();
        let buffer = RetryBuffer::new(10, DEFAULT_MAX_AGE);
        for _ in 0..5 {
            buffer.enqueue(op());
        }
        buffer.flush(&backend).await;
        assert_eq!(buffer.size(), 0);
        assert_eq!(buffer.stats().total_flushed, 5);
    }

    #[tokio::test]
    async fn flush_stops_on_first_failure_and_requeues() {
        let backend = crate::storage::InMemoryBackend::new();
        backend.set_reachable(false);
        let buffer = RetryBuffer::new(10, DEFAULT_MAX_AGE);
        buffer.enqueue(op());
        buffer.enqueue(op());
        buffer.flush(&backend).await;
        assert_eq!(buffer.size(), 2);
        assert_eq!(buffer.stats().total_flushed, 0);
    }
}
