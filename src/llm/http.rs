//! HTTP plumbing shared by the provider clients

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

use crate::llm::core::error::LlmError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the HTTP client used by every provider
///
/// Only the connect phase is bounded; response latency is left to the provider.
pub fn build_http_client() -> Result<Client, LlmError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| LlmError::NetworkError(format!("Failed to create HTTP client: {}", e)))
}

/// Parse a `Retry-After` header given in whole seconds
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Turn a successful response into `T`, or a failed one into the matching [`LlmError`]
///
/// `describe` pulls a human-readable message out of the provider's error body.
pub async fn read_json<T, F>(response: Response, provider: &str, describe: F) -> Result<T, LlmError>
where
    T: DeserializeOwned,
    F: Fn(&str) -> String,
{
    let status = response.status();
    if status.is_success() {
        let body = response.text().await?;
        return Ok(serde_json::from_str(&body)?);
    }

    let retry = retry_after(response.headers());
    let body = response.text().await.unwrap_or_default();
    warn!(provider, status = status.as_u16(), "completion request failed");
    Err(LlmError::from_status(status.as_u16(), describe(&body), retry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_retry_after_missing_or_date() {
        assert_eq!(retry_after(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }
}
