//! The multiplexed telemetry bus: channel publish/subscribe
//! with validated envelopes, wildcard subscribers, bounded last-N
//! retention for late joiners, and non-blocking drop-oldest delivery to
//! slow subscribers.
//!
//! Built on `tokio::sync::broadcast`, whose lagging-receiver behavior
//! (`RecvError::Lagged`) gives slow subscribers dropped events rather
//! than a blocked bus — no custom ring buffer is needed per subscriber.

use aegis_core::Envelope;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use tokio::sync::broadcast;

use crate::error::TelemetryError;
use crate::validation;

pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 100;
pub const DEFAULT_RETENTION: usize = 100;
pub const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 5_000;

const WILDCARD: &str = "*";

pub struct Bus {
    buffer_size: usize,
    retention: usize,
    senders: RwLock<HashMap<String, broadcast::Sender<Envelope>>>,
    recent: RwLock<HashMap<String, VecDeque<Envelope>>>,
    validation_failures: RwLock<VecDeque<TelemetryError>>,
}

/// A connection's view of the bus: one receiver per subscribed channel,
/// merged by `recv`.
pub struct Subscription {
    /// Replayed retained history for the requested channels, delivered
    /// once at subscribe time so a reconnecting client is not left waiting
    /// on history it already missed.
    pub backlog: Vec<Envelope>,
    receivers: Vec<broadcast::Receiver<Envelope>>,
}

impl Subscription {
    /// Awaits the next envelope across every subscribed channel. Lagged
    /// receivers (the subscriber fell behind) are silently skipped to
    /// the next available message rather than erroring the connection.
    pub async fn recv(&mut self) -> Option<Envelope> {
        loop {
            if self.receivers.is_empty() {
                return None;
            }
            let futures = self.receivers.iter_mut().map(|r| Box::pin(r.recv()));
            let (result, _index, _remaining) = futures::future::select_all(futures).await;
            match result {
                Ok(envelope) => return Some(envelope),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Bus {
    pub fn new(buffer_size: usize, retention: usize) -> Self {
        Self {
            buffer_size,
            retention,
            senders: RwLock::new(HashMap::new()),
            recent: RwLock::new(HashMap::new()),
            validation_failures: RwLock::new(VecDeque::with_capacity(64)),
        }
    }

    fn sender_for(&self, channel: &str) -> broadcast::Sender<Envelope> {
        if let Some(sender) = self.senders.read().get(channel) {
            return sender.clone();
        }
        let mut senders = self.senders.write();
        senders
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .clone()
    }

    /// Idempotent registration for `channels`. Replays retained history
    /// for the requested channels into `Subscription::backlog`. `"*"` is
    /// just another channel name here — callers that want wildcard
    /// fan-out subscribe to it explicitly; publishers already copy every
    /// message onto the wildcard sender (see `publish`), so a plain
    /// per-channel subscription never sees traffic from other channels.
    pub fn subscribe(&self, channels: &[String]) -> Subscription {
        let mut receivers = Vec::with_capacity(channels.len());
        let mut backlog = Vec::new();

        for channel in channels {
            receivers.push(self.sender_for(channel).subscribe());
            if let Some(history) = self.recent.read().get(channel) {
                backlog.extend(history.iter().cloned());
            }
        }

        Subscription { backlog, receivers }
    }

    /// Validates, envelope-wraps, retains, and fans out to matching
    /// channel subscribers plus any wildcard subscribers. Validation
    /// failures go to an error sink and never crash the bus.
    pub fn publish(&self, channel: &str, data: serde_json::Value) {
        if let Err(err) = validation::validate(channel, &data) {
            tracing::warn!(%channel, error = %err, "envelope failed validation");
            let mut failures = self.validation_failures.write();
            if failures.len() >= 64 {
                failures.pop_front();
            }
            failures.push_back(err);
            return;
        }

        let envelope = Envelope::new(channel, data);

        {
            let mut recent = self.recent.write();
            let history = recent.entry(channel.to_string()).or_default();
            if history.len() >= self.retention {
                history.pop_front();
            }
            history.push_back(envelope.clone());
        }

        // Non-blocking: `send` on a broadcast channel never awaits; an
        // `Err` here only means there are currently no subscribers.
        let _ = self.sender_for(channel).send(envelope.clone());
        let _ = self.sender_for(WILDCARD).send(envelope);
    }

    pub fn validation_failure_count(&self) -> usize {
        self.validation_failures.read().len()
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.senders
            .read()
            .get(channel)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER, DEFAULT_RETENTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_delivers_to_matching_subscriber() {
        let bus = Bus::default();
        let mut sub = bus.subscribe(&["npc-events".to_string()]);
        bus.publish("npc-events", json!({"hello": "world"}));
        let envelope = sub.recv().await.unwrap();
        assert_eq!(envelope.channel, "npc-events");
    }

    #[tokio::test]
    async fn wildcard_subscriber_receives_every_channel() {
        let bus = Bus::default();
        let mut sub = bus.subscribe(&["*".to_string()]);
        bus.publish("telemetry", json!({}));
        bus.publish("rebellion-alerts", json!({}));
        let first = sub.recv().await.unwrap();
        let second = sub.recv().await.unwrap();
        assert_ne!(first.channel, second.channel);
    }

    #[tokio::test]
    async fn late_joiner_receives_retained_backlog() {
        let bus = Bus::default();
        bus.publish("system-status", json!({"n": 1}));
        bus.publish("system-status", json!({"n": 2}));
        let sub = bus.subscribe(&["system-status".to_string()]);
        assert_eq!(sub.backlog.len(), 2);
    }

    #[tokio::test]
    async fn invalid_envelope_is_sent_to_error_sink_not_the_bus() {
        let bus = Bus::default();
        bus.publish("not-a-real-channel", json!({}));
        assert_eq!(bus.validation_failure_count(), 1);
    }

    #[test]
    fn s7_vetoed_event_publishes_rails_and_alert_not_npc_events() {
        let bus = Bus::default();
        bus.publish("cognitive-rails", json!({"reason": "vetoed"}));
        bus.publish("rebellion-alerts", json!({"reason": "vetoed"}));
        assert_eq!(bus.subscriber_count("npc-events"), 0);
    }
}
