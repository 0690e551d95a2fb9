//! Update configuration.
//!
//! Supplies the feed URLs to the update service and builds the HTTP client
//! used to fetch them.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::http::HttpClient;

/// Latest release of the desktop application on GitHub.
pub const DEFAULT_CHECK_FOR_UPDATE_URL: &str =
    "https://api.github.com/repos/musescore/MuseScore/releases/latest";

/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for reading the feed locations (useful for testing)
#[cfg_attr(test, mockall::automock)]
pub trait UpdateConfiguration: Send + Sync {
    /// URL of the latest-release feed
    fn check_for_update_url(&self) -> String;

    /// URL of the previous-releases notes feed
    fn previous_releases_notes_url(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub check_for_update_url: String,
    pub previous_releases_notes_url: String,
    /// Bearer token sent with every request (GITHUB_TOKEN)
    pub token: Option<String>,
    pub timeout: Duration,
}

impl UpdateConfig {
    pub fn new(check_for_update_url: Option<String>, previous_releases_notes_url: String) -> Self {
        Self {
            check_for_update_url: check_for_update_url
                .unwrap_or_else(|| DEFAULT_CHECK_FOR_UPDATE_URL.to_string()),
            previous_releases_notes_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the HTTP client for fetching feeds.
    pub fn http_client(&self) -> Result<HttpClient> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GITHUB_TOKEN contains invalid header characters")?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GITHUB_TOKEN for authentication: {}", mask(token));
        }

        let client = Client::builder()
            .user_agent(concat!("update-check/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpClient::new(client))
    }
}

impl UpdateConfiguration for UpdateConfig {
    fn check_for_update_url(&self) -> String {
        self.check_for_update_url.clone()
    }

    fn previous_releases_notes_url(&self) -> String {
        self.previous_releases_notes_url.clone()
    }
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
