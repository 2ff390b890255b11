//! Failure velocity tracking: a rolling failures-per-minute rate used
//! to drive Phoenix recovery early, ahead of the "≥3 services down"
//! rule, when failures are accelerating rather than merely
//! accumulating.

use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_WINDOW_SECS: i64 = 60;
pub const DEFAULT_THRESHOLD_PER_MINUTE: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct FailureVelocity {
    failure_times: Vec<DateTime<Utc>>,
    window_secs: i64,
    threshold: f64,
}

impl FailureVelocity {
    pub fn new(window_secs: i64, threshold: f64) -> Self {
        Self {
            failure_times: Vec::new(),
            window_secs,
            threshold,
        }
    }

    pub fn record(&mut self) {
        let now = Utc::now();
        self.failure_times.push(now);
        let cutoff = now - Duration::seconds(self.window_secs);
        self.failure_times.retain(|t| *t > cutoff);
    }

    pub fn velocity(&self) -> f64 {
        if self.failure_times.is_empty() {
            return 0.0;
        }
        let count = self.failure_times.len() as f64;
        let window_minutes = self.window_secs as f64 / 60.0;
        count / window_minutes
    }

    pub fn is_accelerating(&self) -> bool {
        self.velocity() > self.threshold
    }
}

impl Default for FailureVelocity {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SECS, DEFAULT_THRESHOLD_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_rises_with_recorded_failures() {
        let mut tracker = FailureVelocity::new(60, 10.0);
        for _ in 0..5 {
            tracker.record();
        }
        assert_eq!(tracker.velocity(), 5.0);
        assert!(!tracker.is_accelerating());
    }

    #[test]
    fn accelerating_once_threshold_crossed() {
        let mut tracker = FailureVelocity::new(60, 5.0);
        for _ in 0..6 {
            tracker.record();
        }
        assert!(tracker.is_accelerating());
    }
}
