//! Retry policy for feed requests with error classification.

use reqwest::{Response, StatusCode};
use thiserror::Error;

/// Maximum number of attempts for a single request.
pub const MAX_RETRIES: usize = 3;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// GitHub reports an exhausted quota as 403 with this header set to `0`.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Feed responses that a repeated request cannot fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonRetryableError {
    #[error("Feed server rate limit exceeded for {url}. Try again later or set GITHUB_TOKEN.")]
    RateLimited { url: String },
    #[error("Feed server rejected the credentials for {url}. Check GITHUB_TOKEN.")]
    Unauthorized { url: String },
    #[error("Access to feed {url} is forbidden")]
    Forbidden { url: String },
    #[error("Feed not found at {url}")]
    NotFound { url: String },
    /// Any other 4xx
    #[error("Feed request to {url} was rejected with HTTP {status}")]
    Rejected { status: u16, url: String },
}

/// Classifies a response by status.
///
/// `Ok(())` covers successes and transient failures (5xx); a client error
/// becomes the matching [`NonRetryableError`].
pub fn classify_response(response: &Response) -> Result<(), NonRetryableError> {
    let url = response.url().to_string();

    match response.status() {
        StatusCode::UNAUTHORIZED => Err(NonRetryableError::Unauthorized { url }),
        StatusCode::FORBIDDEN if rate_limit_exhausted(response) => {
            Err(NonRetryableError::RateLimited { url })
        }
        StatusCode::FORBIDDEN => Err(NonRetryableError::Forbidden { url }),
        StatusCode::TOO_MANY_REQUESTS => Err(NonRetryableError::RateLimited { url }),
        StatusCode::NOT_FOUND => Err(NonRetryableError::NotFound { url }),
        s if s.is_client_error() => Err(NonRetryableError::Rejected {
            status: s.as_u16(),
            url,
        }),
        _ => Ok(()),
    }
}

fn rate_limit_exhausted(response: &Response) -> bool {
    response
        .headers()
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        == Some("0")
}

/// Passes a successful response through. Client errors come back as
/// [`NonRetryableError`]; server errors keep their `reqwest::Error` so the
/// caller retries them.
pub fn check_status(response: Response) -> anyhow::Result<Response> {
    classify_response(&response)?;
    Ok(response.error_for_status()?)
}
