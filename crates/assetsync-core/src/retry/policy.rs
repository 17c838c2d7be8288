use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Always wait `base_delay`.
    Fixed,
    /// `base_delay * 2^(attempt-1)`, capped at `max_delay`.
    Exponential,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Attempt budget plus backoff for one fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// Base delay for fixed and exponential backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::immediate(2)
    }
}

impl RetryPolicy {
    /// `max_retries` extra attempts after the first, with no delay between them.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            backoff: Backoff::None,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Decide whether to retry after a failed attempt.
    ///
    /// `attempt` is 1-based (1 = first attempt). Returns `RetryDecision::NoRetry`
    /// when the attempt budget is spent.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        let delay = match self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                self.base_delay.saturating_mul(exp).min(self.max_delay)
            }
        };
        RetryDecision::RetryAfter(delay)
    }
}
