//! Bounded retry with exponential backoff for upstream calls.
//!
//! Only gateway-style failures (502, 503, 504) are retried. A timed-out
//! attempt ends the loop immediately with [`CompletionError::Timeout`].

use crate::error::CompletionError;
use log::warn;
use std::future::Future;
use std::time::Duration;

pub const RETRYABLE_STATUSES: [u16; 3] = [502, 503, 504];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, where `attempt` starts at 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exp)
    }
}

/// Result of one attempt as seen by the retry loop.
#[derive(Debug)]
pub enum AttemptError {
    /// Upstream answered with a retryable status.
    Retryable(u16),
    /// Anything else; returned to the caller as is.
    Fatal(CompletionError),
}

pub fn is_retryable(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut attempt_fn: F) -> Result<T, CompletionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_status = 0;

    for attempt in 1..=max_attempts {
        let outcome = match tokio::time::timeout(policy.timeout, attempt_fn()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Completion attempt {} timed out after {:?}", attempt, policy.timeout);
                return Err(CompletionError::Timeout);
            }
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Retryable(status)) => {
                last_status = status;
                if attempt < max_attempts {
                    let delay = policy.backoff(attempt);
                    warn!(
                        "Upstream returned {} on attempt {}/{}, retrying in {:?}",
                        status,
                        attempt,
                        max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(CompletionError::RetriesExhausted {
        attempts: max_attempts,
        status: last_status,
    })
}
