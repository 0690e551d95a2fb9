//! Feed wire types.
//!
//! The latest-release feed follows the GitHub release shape (`tag_name`,
//! `assets[].browser_download_url`) and may carry a supplementary
//! `assetsNew` list. The previous-releases feed is a flat list of notes.

use serde::Deserialize;

use super::{ReleaseAsset, ReleaseNote};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LatestReleaseFeed {
    pub tag_name: String,
    pub body: Option<String>,
    pub assets: Vec<Asset>,
    #[serde(default, rename = "assetsNew")]
    pub assets_new: Vec<Asset>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PreviousReleasesFeed {
    pub releases: Vec<Note>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub version: String,
    pub notes: String,
}

impl LatestReleaseFeed {
    /// All assets of the release: the primary list followed by the
    /// supplementary one.
    pub fn all_assets(&self) -> Vec<ReleaseAsset> {
        self.assets
            .iter()
            .chain(self.assets_new.iter())
            .cloned()
            .map(ReleaseAsset::from)
            .collect()
    }

    /// Release version with any leading `v` removed.
    pub fn version(&self) -> &str {
        self.tag_name
            .strip_prefix('v')
            .or_else(|| self.tag_name.strip_prefix('V'))
            .unwrap_or(&self.tag_name)
    }
}

impl From<Asset> for ReleaseAsset {
    fn from(a: Asset) -> Self {
        ReleaseAsset {
            name: a.name,
            download_url: a.browser_download_url,
        }
    }
}

impl From<Note> for ReleaseNote {
    fn from(n: Note) -> Self {
        ReleaseNote {
            version: n.version,
            notes: n.notes,
        }
    }
}
