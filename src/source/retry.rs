//! Bounded retry combinator

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FetchConfig;

/// Attempt count, per-attempt timeout and pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub delay: Duration,
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            attempt_timeout: config.attempt_timeout(),
            delay: config.retry_delay(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` attempts are spent.
///
/// A timeout or an `Err` consumes one attempt. Returns `None` once every
/// attempt failed; failures are never propagated as errors.
pub async fn retry_bounded<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    for attempt in 1..=policy.max_attempts {
        match tokio::time::timeout(policy.attempt_timeout, op()).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(e)) => debug!(
                target_url = label,
                attempt,
                max_attempts = policy.max_attempts,
                error = %e,
                "Request failed"
            ),
            Err(_) => debug!(
                target_url = label,
                attempt,
                max_attempts = policy.max_attempts,
                timeout_secs = policy.attempt_timeout.as_secs_f64(),
                "Request timed out"
            ),
        }

        if attempt < policy.max_attempts && !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
    }

    warn!(
        target_url = label,
        attempts = policy.max_attempts,
        "Giving up after exhausting all attempts"
    );
    None
}
