//! Release domain model.
//!
//! These values are built fresh for each update check and handed to the
//! caller; nothing here is persisted.

pub mod feed;

use serde::Serialize;

pub use feed::{LatestReleaseFeed, PreviousReleasesFeed};

/// A downloadable installer from a release.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
}

/// Notes published for one earlier release.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct ReleaseNote {
    pub version: String,
    pub notes: String,
}

impl ReleaseNote {
    pub fn new(version: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            notes: notes.into(),
        }
    }
}

/// The resolved answer of an update check for one platform.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct ReleaseInfo {
    /// Version of the latest release, without a leading `v`
    pub version: String,
    /// Release notes of the latest release
    pub notes: String,
    /// Installer file name for this platform
    pub file_name: String,
    /// Installer download URL for this platform
    pub file_url: String,
    /// Notes of releases newer than the running version, oldest first
    pub previous_releases_notes: Vec<ReleaseNote>,
}
