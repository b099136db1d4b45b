//! Retry helper for HTTP requests with exponential backoff.
//!
//! Requests that the cluster throttles with HTTP 429 (Too Many Requests) are
//! retried with exponential backoff. Every other failure is returned as is.

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Error body returned by Elasticsearch.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        reason: Option<String>,
    },
    Plain(String),
}

impl ErrorDetail {
    fn message(self) -> String {
        match self {
            Self::Structured {
                kind,
                reason: Some(reason),
            } => format!("{}: {}", kind, reason),
            Self::Structured { kind, reason: None } => kind,
            Self::Plain(message) => message,
        }
    }
}

/// Sends an HTTP request, retrying HTTP 429 responses.
///
/// - Backoff doubles per attempt (1s, 2s, 4s = 2^attempt).
/// - `max_retries` of zero sends the request exactly once.
/// - Non-success responses become [`ClientError::ApiError`] with the cluster's
///   `type: reason` message when the body is a standard error document.
///
/// # Errors
///
/// Returns `ClientError::MaxRetriesExceeded` when all retry attempts are exhausted.
/// Propagates transport failures as `ClientError::HttpError`.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
) -> Result<Response> {
    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None => {
                debug!("Request builder cannot be cloned, single attempt only");
                return check_status(builder.send().await?).await;
            }
        };

        let response = attempt_builder.send().await?;
        let status = response.status().as_u16();
        if !ClientError::is_retryable_status(status) {
            if attempt > 0 {
                debug!(attempt = attempt + 1, "Request succeeded after retry");
            }
            return check_status(response).await;
        }

        if attempt < max_retries {
            let backoff_secs = 2u64.pow(attempt as u32);
            debug!(
                attempt = attempt + 1,
                max_retries = max_retries + 1,
                backoff_secs = backoff_secs,
                "Rate limited (HTTP 429), retrying with exponential backoff"
            );
            tokio::time::sleep(tokio::time::Duration::from_secs(backoff_secs)).await;
        } else if max_retries == 0 {
            return check_status(response).await;
        }
    }

    debug!(
        attempts = max_retries + 1,
        "Max retries exhausted for rate-limited request"
    );
    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

/// Turn a non-success response into an `ApiError`.
async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error.message(),
        Err(_) => body,
    };

    Err(ClientError::ApiError {
        status,
        url,
        message,
    })
}
