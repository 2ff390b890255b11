//! Bounded concurrent session pool with acquisition timeout.
//! `with_session` acquires, invokes, and releases on every exit
//! path, including failures — realized here with a semaphore permit
//! whose `Drop` always releases.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::error::SynapseError;

pub struct SessionPool {
    semaphore: Semaphore,
    acquire_timeout: Duration,
}

impl SessionPool {
    pub fn new(capacity: usize, acquire_timeout: Duration) -> Self {
        Self {
            semaphore: Semaphore::new(capacity),
            acquire_timeout,
        }
    }

    /// Acquire a session slot, run `f`, and release the slot on every
    /// exit path (success or error) via the permit's `Drop` impl.
    pub async fn with_session<F, Fut, T>(&self, f: F) -> Result<T, SynapseError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let permit = tokio::time::timeout(self.acquire_timeout, self.semaphore.acquire())
            .await
            .map_err(|_| SynapseError::SessionPoolExhausted)?
            .map_err(|_| SynapseError::SessionPoolExhausted)?;

        let result = f().await;
        drop(permit);
        Ok(result)
    }
}

impl Default for SessionPool {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_session_releases_permit_on_success() {
        let pool = SessionPool::new(1, Duration::from_secs(1));
        pool.with_session(|| async { 1 }).await.unwrap();
        pool.with_session(|| async { 2 }).await.unwrap();
    }

    #[tokio::test]
    async fn acquisition_times_out_when_pool_is_saturated() {
        let pool = SessionPool::new(1, Duration::from_millis(50));
        let _permit = pool.semaphore.acquire().await.unwrap();
        let result = pool.with_session(|| async { 1 }).await;
        assert!(result.is_err());
    }
}
