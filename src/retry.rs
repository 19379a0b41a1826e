use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use log::warn;
use tokio::time::{Instant, sleep};

use crate::clients::errors::{ErrorKind, Result};

/// Retry bounds and pacing for remote calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of invocations per call (including the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Minimum spacing between consecutive calls, if throttling is wanted.
    pub min_interval: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(3),
            min_interval: None,
        }
    }
}

/// Wraps remote calls with bounded retry.
///
/// Failures degrade to `None` rather than propagating: callers treat a
/// `None` as "skip this unit of work". Only transient errors (see
/// [`crate::clients::errors::ErrorKind`]) are retried; a terminal error
/// gives up after the first attempt.
pub struct Retrier {
    policy: RetryPolicy,
    last_call: Mutex<Option<Instant>>,
}

impl Retrier {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            last_call: Mutex::new(None),
        }
    }

    /// Invoke `op` until it succeeds or the policy is exhausted.
    ///
    /// `what` names the operation in log lines.
    pub async fn call<T, F, Fut>(&self, what: &str, mut op: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.pace().await;
        let max = self.policy.max_attempts.max(1);
        for attempt in 1..=max {
            match op().await {
                Ok(value) => return Some(value),
                Err(err) if err.kind() == ErrorKind::Terminal => {
                    warn!("{what}: {err}; not retrying");
                    return None;
                }
                Err(err) => {
                    warn!("{what}: attempt {attempt}/{max} failed: {err}");
                    if attempt < max {
                        sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }
        warn!("{what}: giving up after {max} attempts");
        None
    }

    /// Fixed-interval throttle applied before the first attempt of a call.
    async fn pace(&self) {
        let Some(min_interval) = self.policy.min_interval else {
            return;
        };
        let now = Instant::now();
        let wait = {
            let mut last = self
                .last_call
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let wait = match *last {
                Some(prev) => min_interval
                    .checked_sub(now.duration_since(prev))
                    .unwrap_or(Duration::ZERO),
                None => Duration::ZERO,
            };
            *last = Some(now + wait);
            wait
        };
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::errors::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> Error {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "timed out",
        ))
    }

    fn terminal() -> Error {
        Error::Configuration("bad credentials".into())
    }

    #[tokio::test(start_paused = true)]
    async fn returns_success_after_transient_failures() {
        let retrier = Retrier::new(RetryPolicy::default());
        let calls = AtomicU32::new(0);
        let result = retrier
            .call("op", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(transient())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(result, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_the_budget_on_persistent_transient_failure() {
        let retrier = Retrier::new(RetryPolicy::default());
        let calls = AtomicU32::new(0);
        let result: Option<u32> = retrier
            .call("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;
        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_errors_are_not_retried() {
        let retrier = Retrier::new(RetryPolicy::default());
        let calls = AtomicU32::new(0);
        let result: Option<u32> = retrier
            .call("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(terminal()) }
            })
            .await;
        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn spaces_out_consecutive_calls() {
        let retrier = Retrier::new(RetryPolicy {
            min_interval: Some(Duration::from_secs(5)),
            ..RetryPolicy::default()
        });
        let start = Instant::now();
        retrier.call("a", || async { Ok(()) }).await;
        retrier.call("b", || async { Ok(()) }).await;
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
