//! Restart budget: at most N restarts within a sliding window;
//! exhaustion quarantines the service. A `Vec` of timestamps pruned to
//! the window on each check, rather than a fixed-size counter that
//! would need manual reset logic.

use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_MAX_RESTARTS: u32 = 5;
pub const DEFAULT_WINDOW_SECS: i64 = 300;

pub struct RestartBudget {
    restart_times: Vec<DateTime<Utc>>,
    max_restarts: u32,
    window_secs: i64,
    quarantined: bool,
}

impl RestartBudget {
    pub fn new(max_restarts: u32, window_secs: i64) -> Self {
        Self {
            restart_times: Vec::new(),
            max_restarts,
            window_secs,
            quarantined: false,
        }
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(self.window_secs);
        self.restart_times.retain(|t| *t > cutoff);
    }

    /// Attempts to consume one restart from the budget. Returns `Err` if
    /// the window is already saturated, quarantining the service.
    pub fn try_consume(&mut self, service: &str) -> Result<(), crate::error::WatchdogError> {
        let now = Utc::now();
        self.prune(now);

        if self.restart_times.len() as u32 >= self.max_restarts {
            self.quarantined = true;
            return Err(crate::error::WatchdogError::BudgetExhausted {
                service: service.to_string(),
                used: self.restart_times.len() as u32,
                max: self.max_restarts,
                window_secs: self.window_secs,
            });
        }

        self.restart_times.push(now);
        Ok(())
    }

    pub fn is_quarantined(&self) -> bool {
        self.quarantined
    }

    pub fn remaining(&mut self) -> u32 {
        self.prune(Utc::now());
        self.max_restarts.saturating_sub(self.restart_times.len() as u32)
    }
}

impl Default for RestartBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESTARTS, DEFAULT_WINDOW_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_up_to_max_then_quarantines() {
        let mut budget = RestartBudget::new(2, 300);
        assert!(budget.try_consume("svc").is_ok());
        assert!(budget.try_consume("svc").is_ok());
        assert!(budget.try_consume("svc").is_err());
        assert!(budget.is_quarantined());
    }

    #[test]
    fn remaining_reflects_consumption() {
        let mut budget = RestartBudget::new(5, 300);
        budget.try_consume("svc").unwrap();
        budget.try_consume("svc").unwrap();
        assert_eq!(budget.remaining(), 3);
    }
}
