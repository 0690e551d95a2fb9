//! HTTP client with built-in retry logic and error handling.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

use super::RequestHeaders;
use super::retry::{MAX_RETRIES, NonRetryableError, RETRY_DELAY_MS, check_status};

/// HTTP client with built-in retry logic for feed requests.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry_delay: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }

    /// Overrides the delay between attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and writes the response body into `sink`.
    /// Automatically retries on transient errors; `sink` only ever holds the
    /// body of the last attempt.
    #[tracing::instrument(skip(self, headers, sink))]
    pub async fn get_into(
        &self,
        url: &str,
        headers: &RequestHeaders,
        sink: &mut Vec<u8>,
    ) -> Result<u64> {
        debug!("GET {}...", url);

        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            sink.clear();
            match self.get_into_once(url, headers, sink).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    if !is_retryable_error(&e) {
                        debug!("GET {}: non-retryable error: {}", url, e);
                        sink.clear();
                        return Err(e);
                    }

                    if attempt < MAX_RETRIES {
                        warn!(
                            "GET {}: attempt {}/{} failed ({}), retrying in {}ms...",
                            url,
                            attempt,
                            MAX_RETRIES,
                            e,
                            self.retry_delay.as_millis()
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        sink.clear();
        Err(last_error
            .unwrap_or_else(|| anyhow::anyhow!("GET {}: failed after {} attempts", url, MAX_RETRIES)))
    }

    /// Single attempt without retry.
    async fn get_into_once(
        &self,
        url: &str,
        headers: &RequestHeaders,
        sink: &mut Vec<u8>,
    ) -> Result<u64> {
        let mut request = self.client.get(url);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        let response = request.send().await.context("Failed to send request")?;
        let mut response = check_status(response)?;

        let mut received: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from response stream")?
        {
            sink.extend_from_slice(&chunk);
            received += chunk.len() as u64;
        }

        debug!("Received {} bytes from {}", received, url);
        Ok(received)
    }
}

/// Checks if an anyhow::Error is retryable based on its content.
fn is_retryable_error(e: &anyhow::Error) -> bool {
    // Everything that isn't explicitly non-retryable is retried
    e.downcast_ref::<NonRetryableError>().is_none()
}
