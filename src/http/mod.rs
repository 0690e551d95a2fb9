//! Network capability: fetching feeds over HTTP.
//!
//! The update service only sees the [`NetworkManager`] trait. Retries live
//! here, in [`HttpClient`], never in the service.

mod client;
mod retry;

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

pub use client::HttpClient;
pub use retry::{
    MAX_RETRIES, NonRetryableError, RETRY_DELAY_MS, check_status, classify_response,
};

/// Request headers, sent in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: Vec<(String, String)>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing an earlier value with the same
    /// (case-insensitive) name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error(transparent)]
    NonRetryable(#[from] NonRetryableError),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<anyhow::Error> for NetworkError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<NonRetryableError>() {
            Ok(non_retryable) => NetworkError::NonRetryable(non_retryable),
            Err(other) => NetworkError::Request(format!("{:#}", other)),
        }
    }
}

/// Trait for fetching a URL into a caller-supplied buffer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkManager: Send + Sync {
    /// Fetches `url` and writes the response body into `sink`.
    async fn get(
        &self,
        url: &str,
        sink: &mut Vec<u8>,
        headers: &RequestHeaders,
    ) -> Result<(), NetworkError>;
}

/// [`NetworkManager`] backed by reqwest.
#[derive(Clone)]
pub struct HttpNetworkManager {
    http_client: HttpClient,
}

impl HttpNetworkManager {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl NetworkManager for HttpNetworkManager {
    #[tracing::instrument(skip(self, sink, headers))]
    async fn get(
        &self,
        url: &str,
        sink: &mut Vec<u8>,
        headers: &RequestHeaders,
    ) -> Result<(), NetworkError> {
        let bytes = self.http_client.get_into(url, headers, sink).await?;
        debug!("Fetched {} ({} bytes)", url, bytes);
        Ok(())
    }
}
