//! Blocking HTTP GET via libcurl.

use super::Transport;
use crate::retry::FetchError;
use std::time::Duration;

/// User agent sent with every image request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; rv:91.0) Gecko/20100101 QFurniture/1.0";

/// Per-attempt timeout for a whole transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

/// [`Transport`] backed by one curl Easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    user_agent: String,
    timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }
}

impl CurlTransport {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_settings() {
        let t = CurlTransport::default();
        assert_eq!(t.timeout, Duration::from_secs(45));
        assert!(t.user_agent.contains("QFurniture"));
    }

    #[test]
    fn unreachable_host_is_a_curl_error() {
        let t = CurlTransport::new("test-agent", Duration::from_secs(2));
        // Port 9 on loopback is the discard port; nothing listens there in CI.
        let err = t.get("http://127.0.0.1:9/x.jpg").unwrap_err();
        assert!(matches!(err, FetchError::Curl(_)), "got {err}");
    }
}
