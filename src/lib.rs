//! Update checking for the desktop application.
//!
//! Fetches the latest-release and previous-releases feeds, picks the
//! installer for the running platform and collects the notes of every
//! release newer than the running version.

pub mod app;
pub mod asset;
pub mod config;
pub mod http;
pub mod platform;
pub mod release;
pub mod update;
pub mod version;

use anyhow::Result;

use crate::app::AppIdentity;
use crate::config::UpdateConfig;
use crate::http::HttpNetworkManager;
use crate::platform::PlatformDescriptor;
use crate::release::ReleaseInfo;
use crate::update::UpdateService;

/// Runs a single update check against real HTTP feeds.
#[tracing::instrument(skip(config))]
pub async fn check_for_update(
    config: UpdateConfig,
    platform: PlatformDescriptor,
    application: AppIdentity,
) -> Result<ReleaseInfo> {
    let network = HttpNetworkManager::new(config.http_client()?);
    let service = UpdateService::new(network, platform, config, application);
    Ok(service.check_for_update().await?)
}
