//! Minimum-spacing rate limiter with bounded retry.
//!
//! One `RateLimiter` exists per run and is passed by `&mut` into the
//! geocoding loop. Every attempt, retries included, waits until at least
//! `min_delay` has elapsed since the previous attempt started.

use crate::config::RateLimitPolicy;
use crate::error::GeocodeError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct RateLimiter {
    min_delay: Duration,
    max_retries: u32,
    error_wait: Duration,
    last_call: Option<Instant>,
    calls: u64,
}

impl RateLimiter {
    pub fn new(policy: &RateLimitPolicy) -> Self {
        Self {
            min_delay: policy.min_delay,
            max_retries: policy.max_retries,
            error_wait: policy.error_wait,
            last_call: None,
            calls: 0,
        }
    }

    /// Total attempts made through this limiter.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    async fn wait_turn(&mut self) {
        if let Some(last) = self.last_call {
            let next = last + self.min_delay;
            if next > Instant::now() {
                debug!("rate limiter: waiting {:?}", next - Instant::now());
                sleep_until(next).await;
            }
        }
        self.last_call = Some(Instant::now());
        self.calls += 1;
    }

    /// Run `op`, spacing attempts and retrying transient failures.
    ///
    /// Makes at most `max_retries + 1` attempts. Non-transient errors are
    /// returned immediately.
    pub async fn run<T, F, Fut>(&mut self, mut op: F) -> Result<T, GeocodeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeocodeError>>,
    {
        let mut retries = 0u32;
        loop {
            self.wait_turn().await;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && retries < self.max_retries => {
                    retries += 1;
                    warn!(
                        "transient geocoder failure ({e}); retry {retries}/{} in {:?}",
                        self.max_retries, self.error_wait
                    );
                    sleep(self.error_wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn policy() -> RateLimitPolicy {
        RateLimitPolicy::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_spacing_between_calls() {
        let mut limiter = RateLimiter::new(&policy());
        let starts = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..3 {
            let starts = starts.clone();
            let out: Result<(), GeocodeError> = limiter
                .run(|| {
                    let starts = starts.clone();
                    async move {
                        starts.lock().unwrap().push(Instant::now());
                        Ok(())
                    }
                })
                .await;
            assert!(out.is_ok());
        }

        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), 3);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1500));
        }
        assert_eq!(limiter.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_when_spacing_already_elapsed() {
        let mut limiter = RateLimiter::new(&policy());
        let _: Result<(), GeocodeError> = limiter.run(|| async { Ok(()) }).await;
        sleep(Duration::from_secs(3)).await;

        let before = Instant::now();
        let _: Result<(), GeocodeError> = limiter.run(|| async { Ok(()) }).await;
        assert_eq!(Instant::now() - before, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retried_up_to_max() {
        let mut limiter = RateLimiter::new(&policy());
        let attempts = Arc::new(Mutex::new(0u32));

        let start = Instant::now();
        let out: Result<(), GeocodeError> = limiter
            .run(|| {
                let attempts = attempts.clone();
                async move {
                    *attempts.lock().unwrap() += 1;
                    Err(GeocodeError::Timeout)
                }
            })
            .await;

        assert!(matches!(out, Err(GeocodeError::Timeout)));
        assert_eq!(*attempts.lock().unwrap(), 4);
        // Three error waits of 5s dominate the 1.5s spacing.
        assert!(Instant::now() - start >= Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let mut limiter = RateLimiter::new(&policy());
        let attempts = Arc::new(Mutex::new(0u32));

        let out = limiter
            .run(|| {
                let attempts = attempts.clone();
                async move {
                    let mut n = attempts.lock().unwrap();
                    *n += 1;
                    if *n < 3 {
                        Err(GeocodeError::Status(503))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(out.unwrap(), 42);
        assert_eq!(*attempts.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_failure_not_retried() {
        let mut limiter = RateLimiter::new(&policy());
        let attempts = Arc::new(Mutex::new(0u32));

        let out: Result<(), GeocodeError> = limiter
            .run(|| {
                let attempts = attempts.clone();
                async move {
                    *attempts.lock().unwrap() += 1;
                    Err(GeocodeError::Decode("garbage".into()))
                }
            })
            .await;

        assert!(matches!(out, Err(GeocodeError::Decode(_))));
        assert_eq!(*attempts.lock().unwrap(), 1);
    }
}
