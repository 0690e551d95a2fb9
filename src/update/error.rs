use std::fmt;

use thiserror::Error;

use crate::http::NetworkError;

/// Which feed an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    LatestRelease,
    PreviousReleases,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::LatestRelease => write!(f, "latest release"),
            Feed::PreviousReleases => write!(f, "previous releases"),
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to fetch {feed} feed from {url}: {source}")]
    NetworkFetchFailed {
        feed: Feed,
        url: String,
        source: NetworkError,
    },
    #[error("malformed {feed} feed: {message}")]
    MalformedFeed { feed: Feed, message: String },
    #[error("no matching release asset for {platform}")]
    NoMatchingAsset { platform: String },
}

impl UpdateError {
    pub(crate) fn malformed(feed: Feed, message: impl fmt::Display) -> Self {
        UpdateError::MalformedFeed {
            feed,
            message: message.to_string(),
        }
    }
}

pub type UpdateResult<T> = Result<T, UpdateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = UpdateError::NetworkFetchFailed {
            feed: Feed::LatestRelease,
            url: "https://example.com/latest".into(),
            source: NetworkError::Request("connection reset".into()),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch latest release feed from https://example.com/latest: request failed: connection reset"
        );

        let err = UpdateError::malformed(Feed::PreviousReleases, "missing field `releases`");
        assert_eq!(
            err.to_string(),
            "malformed previous releases feed: missing field `releases`"
        );

        let err = UpdateError::NoMatchingAsset {
            platform: "linux/arm".into(),
        };
        assert_eq!(err.to_string(), "no matching release asset for linux/arm");
    }

    #[test]
    fn test_fetch_error_keeps_source() {
        use std::error::Error;

        let err = UpdateError::NetworkFetchFailed {
            feed: Feed::PreviousReleases,
            url: "u".into(),
            source: NetworkError::Request("boom".into()),
        };
        assert!(err.source().is_some());
    }
}
