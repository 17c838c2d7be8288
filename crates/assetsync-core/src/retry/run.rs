//! Retry loop: run a closure until success or policy says stop.

use super::policy::{RetryDecision, RetryPolicy};

/// Last error of a closure that never succeeded, with the attempts spent.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On failure, sleeps for the backoff duration (if any) then tries again.
///
/// Returns the value and the number of attempts it took.
pub fn run_with_retry<T, E, F>(
    policy: &RetryPolicy,
    mut f: F,
) -> Result<(T, u32), RetryExhausted<E>>
where
    E: std::fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok((v, attempt)),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    })
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, error = %e, "attempt failed, retrying");
                    if !d.is_zero() {
                        std::thread::sleep(d);
                    }
                    attempt += 1;
                }
            },
        }
    }
}
