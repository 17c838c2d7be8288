//! Retry and backoff policy for image fetches.
//!
//! Every failed attempt is retried until the attempt budget is spent; the
//! delay between attempts is pluggable (none, fixed, or capped exponential).

mod error;
mod policy;
mod run;

pub use error::FetchError;
pub use policy::{Backoff, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryExhausted};
