// Bounded retry with a fixed pause between attempts.
//
// Both external lookups (ComCat event detail and Geoserve places) are
// flaky enough that a single failure shouldn't decide the outcome. This
// wrapper runs an operation up to `attempts` times, pausing `backoff`
// after every failure, and hands back either the first success or an
// exhaustion marker carrying the last error. Callers decide how to
// degrade; nothing here propagates a service error.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

/// Number of attempts made against an external service before giving up.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Pause after each failed attempt.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(20);

/// How many times to try an operation and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// A policy with no pause between attempts (used by tests).
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            backoff: Duration::ZERO,
        }
    }
}

/// Every attempt failed. Holds the error from the final attempt.
#[derive(Debug)]
pub struct Exhausted {
    pub attempts: u32,
    pub last_error: anyhow::Error,
}

impl fmt::Display for Exhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts: {:#}",
            self.attempts, self.last_error
        )
    }
}

/// Run `operation` under `policy`.
///
/// `label` names the service in the warning logged after each failure,
/// which also states how many attempts remain. The pause follows every
/// failure, including the last one, so a fully failed call blocks for
/// `attempts * backoff` plus the call latency.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    label: &str,
    operation: F,
) -> std::result::Result<T, Exhausted>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut failures = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                failures += 1;
                let remaining = attempts - failures;

                warn!(
                    service = label,
                    error = %format!("{err:#}"),
                    remaining,
                    "{label} request failed, will try {remaining} more times"
                );

                tokio::time::sleep(policy.backoff).await;

                if remaining == 0 {
                    return Err(Exhausted {
                        attempts,
                        last_error: err,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_default_policy_is_three_tries_twenty_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.backoff, Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_first_success_returns_immediately() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result = with_retry(&RetryPolicy::immediate(3), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(7)
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result = with_retry(&RetryPolicy::immediate(3), "test", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                anyhow::bail!("transient failure {n}");
            }
            Ok("ok")
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_keeps_last_error() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: std::result::Result<(), Exhausted> =
            with_retry(&RetryPolicy::immediate(3), "test", move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("failure {n}")
            })
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error.to_string(), "failure 2");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: std::result::Result<(), Exhausted> =
            with_retry(&RetryPolicy::immediate(0), "test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("nope")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_after_every_failure() {
        let start = Instant::now();
        let result: std::result::Result<(), Exhausted> =
            with_retry(&RetryPolicy::default(), "test", || async {
                anyhow::bail!("down")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_after_success() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let start = Instant::now();
        let result = with_retry(&RetryPolicy::default(), "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("first call fails");
            }
            Ok(())
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }
}
