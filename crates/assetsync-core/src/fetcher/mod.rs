//! Single-URL image fetch with bounded retries.
//!
//! A destination that already holds a complete file short-circuits the fetch;
//! otherwise the body is fetched through a [`Transport`] under a
//! [`RetryPolicy`] and written atomically.

mod curl_transport;

pub use curl_transport::{CurlTransport, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use crate::retry::{run_with_retry, FetchError, RetryExhausted, RetryPolicy};
use crate::storage;
use std::path::Path;

/// Byte source for image URLs.
pub trait Transport {
    /// Fetch the full body of `url`; non-2xx responses are errors.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get(url)
    }
}

/// What a successful fetch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Destination was already on disk; no network call made.
    AlreadyPresent,
    /// Body fetched and written.
    Downloaded { bytes: usize, attempts: u32 },
}

/// Fetches one URL to one destination file.
pub struct Fetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch `url` into `destination` unless a complete file is already there.
    pub fn fetch(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<FetchOutcome, RetryExhausted<FetchError>> {
        if storage::is_complete(destination) {
            tracing::debug!(path = %destination.display(), "destination present, skipping fetch");
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let (bytes, attempts) = run_with_retry(&self.policy, || {
            let body = self.transport.get(url)?;
            if body.is_empty() {
                return Err(FetchError::EmptyBody);
            }
            storage::write_atomic(destination, &body)?;
            Ok(body.len())
        })?;

        tracing::debug!(url, bytes, attempts, path = %destination.display(), "image fetched");
        Ok(FetchOutcome::Downloaded { bytes, attempts })
    }
}
