//! HTTP retry helpers for transient errors.
//!
//! Report downloads go through [`send_bytes`] so every request gets
//! automatic retry with exponential backoff on timeouts, connection
//! resets, server errors, and rate limiting.
//!
//! ```ignore
//! let bytes = retry::send_bytes(|| client.get(&url)).await?;
//! ```

use std::time::Duration;

use crate::PdfError;

/// Maximum number of retry attempts for transient HTTP errors.
///
/// With exponential backoff (2s, 4s, 8s, 16s, 32s) the total wait
/// before giving up is 62 seconds.
pub const MAX_RETRIES: u32 = 5;

/// What to do with a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Hand the response to the caller.
    Accept,
    /// Transient; try again after a delay.
    Retry,
    /// Permanent failure.
    Fail,
}

/// Classifies a response status: 429 and 5xx are retried, other 4xx
/// fail immediately, everything else is accepted.
#[must_use]
pub fn classify_status(status: reqwest::StatusCode) -> StatusAction {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        StatusAction::Retry
    } else if status.is_client_error() {
        StatusAction::Fail
    } else {
        StatusAction::Accept
    }
}

/// Backoff before retry number `attempt` (1-based).
#[must_use]
pub const fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Sends an HTTP request and returns the response body as bytes.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (since builders are consumed by
/// `.send()`). A body that fails to arrive in full is re-fetched through
/// the same retry loop.
///
/// # Errors
///
/// Returns [`PdfError::Status`] for a permanent status or one still
/// failing after [`MAX_RETRIES`], and [`PdfError::Http`] for
/// non-transient transport errors.
#[allow(clippy::future_not_send)]
pub async fn send_bytes<F>(build_request: F) -> Result<Vec<u8>, PdfError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    for body_attempt in 0..=MAX_RETRIES {
        let response = send_inner(&build_request, MAX_RETRIES).await?;
        let url = response.url().to_string();

        match response.bytes().await {
            Ok(bytes) => {
                log::debug!("Downloaded {} bytes from {url}", bytes.len());
                return Ok(bytes.to_vec());
            }
            Err(e) => {
                if body_attempt < MAX_RETRIES {
                    let delay = backoff(body_attempt + 1);
                    log::warn!(
                        "Body read failed for {url} (body retry {}/{MAX_RETRIES}), \
                         re-fetching in {delay:?}: {e}",
                        body_attempt + 1,
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                log::error!("Body read failed for {url} after {MAX_RETRIES} retries: {e}");
                return Err(PdfError::Http(e));
            }
        }
    }

    unreachable!("send_bytes body retry loop exited without returning")
}

/// Core retry loop. Returns the first accepted response.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F, max_retries: u32) -> Result<reqwest::Response, PdfError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<PdfError> = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    last_error = Some(PdfError::Http(e));
                    continue;
                }
                return Err(PdfError::Http(e));
            }
            Ok(response) => {
                let status = response.status();
                let action = classify_status(status);
                if action == StatusAction::Accept {
                    return Ok(response);
                }

                let err = PdfError::Status {
                    status: status.as_u16(),
                    url: response.url().to_string(),
                };
                if action == StatusAction::Retry && attempt < max_retries {
                    log::warn!("  {err}");
                    last_error = Some(err);
                    continue;
                }
                return Err(err);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        PdfError::Extraction("request failed after all retries".to_string())
    }))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}
