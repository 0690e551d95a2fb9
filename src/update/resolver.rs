//! Pure release resolution: feed parsing, installer selection and
//! release-notes reconciliation. Nothing here touches the network.

use std::sync::OnceLock;

use log::debug;

use crate::asset::{AssetPicker, PlatformAssetPicker};
use crate::platform::{CpuArchitecture, PlatformInfo, ProductType};
use crate::release::{LatestReleaseFeed, PreviousReleasesFeed, ReleaseAsset, ReleaseInfo, ReleaseNote};
use crate::version::Version;

use super::error::{Feed, UpdateError, UpdateResult};

pub fn parse_latest_release(bytes: &[u8]) -> UpdateResult<LatestReleaseFeed> {
    serde_json::from_slice(bytes).map_err(|e| UpdateError::malformed(Feed::LatestRelease, e))
}

pub fn parse_previous_releases(bytes: &[u8]) -> UpdateResult<PreviousReleasesFeed> {
    serde_json::from_slice(bytes).map_err(|e| UpdateError::malformed(Feed::PreviousReleases, e))
}

/// Resolves the release for `platform` with the default installer rules.
pub fn resolve_release(
    latest: &LatestReleaseFeed,
    previous: &PreviousReleasesFeed,
    platform: &dyn PlatformInfo,
    current: &Version,
) -> UpdateResult<ReleaseInfo> {
    resolve_release_with(&PlatformAssetPicker, latest, previous, platform, current)
}

pub fn resolve_release_with(
    picker: &dyn AssetPicker,
    latest: &LatestReleaseFeed,
    previous: &PreviousReleasesFeed,
    platform: &dyn PlatformInfo,
    current: &Version,
) -> UpdateResult<ReleaseInfo> {
    let asset = select_asset(picker, latest, platform)?;
    let previous_releases_notes = reconcile_notes(previous, current)?;

    Ok(ReleaseInfo {
        version: latest.version().to_string(),
        notes: latest.body.clone().unwrap_or_default(),
        file_name: asset.name,
        file_url: asset.download_url,
        previous_releases_notes,
    })
}

/// Selects the single installer for `platform` from all of the release's
/// asset lists.
pub fn select_asset(
    picker: &dyn AssetPicker,
    latest: &LatestReleaseFeed,
    platform: &dyn PlatformInfo,
) -> UpdateResult<ReleaseAsset> {
    let assets = latest.all_assets();
    let platform = QueriedPlatform::new(platform);
    match picker.pick(&assets, &platform) {
        Some(asset) => {
            debug!("Selected {} ({})", asset.name, asset.download_url);
            Ok(asset.clone())
        }
        None => Err(UpdateError::NoMatchingAsset {
            platform: platform.describe(),
        }),
    }
}

/// Queries each platform property at most once and remembers the answer.
struct QueriedPlatform<'a> {
    inner: &'a dyn PlatformInfo,
    product_type: OnceLock<ProductType>,
    cpu_architecture: OnceLock<CpuArchitecture>,
}

impl<'a> QueriedPlatform<'a> {
    fn new(inner: &'a dyn PlatformInfo) -> Self {
        Self {
            inner,
            product_type: OnceLock::new(),
            cpu_architecture: OnceLock::new(),
        }
    }

    /// `os/arch`, or just `os` when the architecture was never asked for.
    fn describe(&self) -> String {
        let os = self.product_type();
        match self.cpu_architecture.get() {
            Some(arch) => format!("{}/{}", os, arch),
            None => os.to_string(),
        }
    }
}

impl PlatformInfo for QueriedPlatform<'_> {
    fn product_type(&self) -> ProductType {
        *self.product_type.get_or_init(|| self.inner.product_type())
    }

    fn cpu_architecture(&self) -> CpuArchitecture {
        *self
            .cpu_architecture
            .get_or_init(|| self.inner.cpu_architecture())
    }
}

/// Notes for versions newer than `current`, oldest first.
pub fn reconcile_notes(
    previous: &PreviousReleasesFeed,
    current: &Version,
) -> UpdateResult<Vec<ReleaseNote>> {
    let mut newer = Vec::with_capacity(previous.releases.len());

    for note in &previous.releases {
        let version: Version = note.version.parse().map_err(|e| {
            UpdateError::malformed(
                Feed::PreviousReleases,
                format!("release version '{}': {}", note.version, e),
            )
        })?;

        if version <= *current {
            debug!("Skipping notes for {} (running {})", version, current);
            continue;
        }
        newer.push((version, ReleaseNote::from(note.clone())));
    }

    newer.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(newer.into_iter().map(|(_, note)| note).collect())
}
