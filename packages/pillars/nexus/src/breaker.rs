//! Per-provider circuit breaker: a `Closed -> Open` at a failure threshold,
//! `Open -> HalfOpen` after a reset timeout, `HalfOpen -> Closed` after
//! enough consecutive probe successes.
//!
//! `success_threshold` defaults to 1 probe rather than 3 consecutive
//! successes, implemented as a configurable field rather than a forked
//! state machine.

use aegis_core::CircuitState;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct BreakerConfig {
    pub fail_threshold: u32,
    pub open_duration: Duration,
    pub half_open_probes: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            fail_threshold: 5,
            open_duration: Duration::from_secs(30),
            half_open_probes: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Closed,
    Open,
    HalfOpen,
}

struct Inner {
    phase: Phase,
    failure_count: u32,
    half_open_successes: u32,
    opened_at: Option<Instant>,
}

pub struct CircuitBreaker {
    config: BreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                phase: Phase::Closed,
                failure_count: 0,
                half_open_successes: 0,
                opened_at: None,
            }),
        }
    }

    /// Whether a call is currently allowed through. `Open` transitions
    /// itself to `HalfOpen` once `open_duration` has elapsed, admitting
    /// exactly the probe that triggers the check.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Closed => true,
            Phase::HalfOpen => true,
            Phase::Open => {
                let elapsed = inner.opened_at.map(|t| t.elapsed()).unwrap_or_default();
                if elapsed >= self.config.open_duration {
                    inner.phase = Phase::HalfOpen;
                    inner.half_open_successes = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Closed => {
                inner.failure_count = inner.failure_count.saturating_sub(1);
            }
            Phase::HalfOpen => {
                inner.half_open_successes += 1;
                if inner.half_open_successes >= self.config.half_open_probes {
                    inner.phase = Phase::Closed;
                    inner.failure_count = 0;
                }
            }
            Phase::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.config.fail_threshold {
                    inner.phase = Phase::Open;
                    inner.opened_at = Some(Instant::now());
                }
            }
            Phase::HalfOpen => {
                inner.phase = Phase::Open;
                inner.opened_at = Some(Instant::now());
                inner.half_open_successes = 0;
            }
            Phase::Open => {}
        }
    }

    pub fn state(&self) -> CircuitState {
        let inner = self.inner.lock();
        match inner.phase {
            Phase::Closed => CircuitState::Closed {
                failure_count: inner.failure_count,
            },
            Phase::Open => CircuitState::Open {
                opened_at: aegis_core::MeshTimestamp::now(),
            },
            Phase::HalfOpen => CircuitState::HalfOpen {
                probe_in_flight: inner.half_open_successes > 0,
            },
        }
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_five_failures_open_the_breaker() {
        let breaker = CircuitBreaker::default();
        for _ in 0..5 {
            breaker.record_failure();
        }
        assert!(!breaker.is_allowed());
    }

    #[test]
    fn breaker_half_opens_after_reset_timeout() {
        let breaker = CircuitBreaker::new(BreakerConfig {
            fail_threshold: 1,
            open_duration: Duration::from_millis(10),
            half_open_probes: 1,
        });
        breaker.record_failure();
        assert!(!breaker.is_allowed());
        std::thread::sleep(Duration::from_millis(20));
        assert!(breaker.is_allowed());
    }

    #[test]
    fn single_half_open_success_closes_breaker() {
        let breaker = CircuitBreaker::new(BreakerConfig {
            fail_threshold: 1,
            open_duration: Duration::from_millis(1),
            half_open_probes: 1,
        });
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(5));
        assert!(breaker.is_allowed()); // transitions to HalfOpen
        breaker.record_success();
        for _ in 0..10 {
            breaker.record_failure();
            if !breaker.is_allowed() {
                break;
            }
        }
        // After closing, it should take the full fail_threshold again to reopen.
        assert!(!breaker.is_allowed());
    }

    #[test]
    fn half_open_failure_reopens() {
        let breaker = CircuitBreaker::new(BreakerConfig {
            fail_threshold: 1,
            open_duration: Duration::from_millis(1),
            half_open_probes: 1,
        });
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(5));
        assert!(breaker.is_allowed());
        breaker.record_failure();
        assert!(!breaker.is_allowed());
    }

    #[test]
    fn closed_success_decays_failure_count() {
        let breaker = CircuitBreaker::default();
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_success();
        for _ in 0..4 {
            breaker.record_failure();
        }
        // Only 3 net failures accumulated, below threshold of 5.
        assert!(breaker.is_allowed());
    }
}
