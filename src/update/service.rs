use log::{debug, info};

use crate::app::Application;
use crate::asset::{AssetPicker, PlatformAssetPicker};
use crate::config::UpdateConfiguration;
use crate::http::{NetworkManager, RequestHeaders};
use crate::platform::PlatformInfo;
use crate::release::ReleaseInfo;

use super::error::{Feed, UpdateError, UpdateResult};
use super::resolver::{parse_latest_release, parse_previous_releases, resolve_release_with};

/// Checks for application updates.
///
/// Collaborators are passed in explicitly; the service keeps no state between
/// checks, so concurrent calls are independent.
pub struct UpdateService<N, P, C, A>
where
    N: NetworkManager,
    P: PlatformInfo,
    C: UpdateConfiguration,
    A: Application,
{
    network: N,
    platform: P,
    configuration: C,
    application: A,
    picker: Box<dyn AssetPicker>,
}

impl<N, P, C, A> UpdateService<N, P, C, A>
where
    N: NetworkManager,
    P: PlatformInfo,
    C: UpdateConfiguration,
    A: Application,
{
    pub fn new(network: N, platform: P, configuration: C, application: A) -> Self {
        Self {
            network,
            platform,
            configuration,
            application,
            picker: Box::new(PlatformAssetPicker),
        }
    }

    /// Replaces the installer selection rules.
    pub fn with_picker(mut self, picker: impl AssetPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    /// Fetches both feeds, one after the other, and resolves the release for
    /// this platform.
    ///
    /// The previous-releases feed is only requested once the latest-release
    /// feed has been fetched and parsed.
    #[tracing::instrument(skip(self))]
    pub async fn check_for_update(&self) -> UpdateResult<ReleaseInfo> {
        let url = self.configuration.check_for_update_url();
        let body = self.fetch(&url, Feed::LatestRelease).await?;
        let latest = parse_latest_release(&body)?;

        let url = self.configuration.previous_releases_notes_url();
        let body = self.fetch(&url, Feed::PreviousReleases).await?;
        let previous = parse_previous_releases(&body)?;

        let current = self.application.full_version();
        let info = resolve_release_with(
            self.picker.as_ref(),
            &latest,
            &previous,
            &self.platform,
            &current,
        )?;

        info!(
            "Latest release {} ({}), running {}, {} newer release note(s)",
            info.version,
            info.file_name,
            current,
            info.previous_releases_notes.len()
        );
        Ok(info)
    }

    async fn fetch(&self, url: &str, feed: Feed) -> UpdateResult<Vec<u8>> {
        debug!("Fetching {} feed from {}...", feed, url);

        let mut headers = RequestHeaders::new();
        headers.insert("Accept", "application/json");

        let mut body = Vec::new();
        self.network
            .get(url, &mut body, &headers)
            .await
            .map_err(|source| UpdateError::NetworkFetchFailed {
                feed,
                url: url.to_string(),
                source,
            })?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MockApplication;
    use crate::config::MockUpdateConfiguration;
    use crate::http::{MockNetworkManager, NetworkError, NonRetryableError};
    use crate::platform::{CpuArchitecture, MockPlatformInfo, ProductType};
    use crate::release::{ReleaseAsset, ReleaseNote};
    use crate::version::Version;
    use mockall::predicate::{always, eq};

    const CHECK_FOR_UPDATE_URL: &str = "checkForUpdateUrl";
    const PREVIOUS_RELEASES_NOTES_URL: &str = "previousReleasesNotesUrl";
    const CURRENT_VERSION: &str = "4.2.1";

    const RELEASE_FEED: &str = r#"{
        "tag_name": "v5.0",
        "assets": [
            { "name": "MuseScore.dmg", "browser_download_url": "blabla" },
            { "name": "MuseScore.msi", "browser_download_url": "blabla" },
            { "name": "MuseScore.AppImage", "browser_download_url": "blabla" }
        ],
        "assetsNew": [
            { "name": "MuseScore-arm.AppImage", "browser_download_url": "blabla" },
            { "name": "MuseScore-aarch64.AppImage", "browser_download_url": "blabla" }
        ]
    }"#;

    /// Previous releases notes in chaotic version order, including the
    /// running version
    fn previous_releases_feed() -> String {
        format!(
            r#"{{
                "releases": [
                    {{ "version": "40000.3", "notes": "blabla3" }},
                    {{ "version": "40000.4", "notes": "blabla4" }},
                    {{ "version": "{}", "notes": "blabla2" }},
                    {{ "version": "0.4.1", "notes": "blabla1" }}
                ]
            }}"#,
            CURRENT_VERSION
        )
    }

    fn expected_headers() -> RequestHeaders {
        let mut headers = RequestHeaders::new();
        headers.insert("Accept", "application/json");
        headers
    }

    /// Serve `body` for `url`, `times` times.
    fn serve(network: &mut MockNetworkManager, url: &'static str, body: String, times: usize) {
        network
            .expect_get()
            .with(eq(url), always(), eq(expected_headers()))
            .times(times)
            .returning(move |_, sink, _| {
                sink.extend_from_slice(body.as_bytes());
                Ok(())
            });
    }

    fn make_network(times: usize) -> MockNetworkManager {
        let mut network = MockNetworkManager::new();
        serve(&mut network, CHECK_FOR_UPDATE_URL, RELEASE_FEED.to_string(), times);
        serve(
            &mut network,
            PREVIOUS_RELEASES_NOTES_URL,
            previous_releases_feed(),
            times,
        );
        network
    }

    fn make_configuration() -> MockUpdateConfiguration {
        let mut configuration = MockUpdateConfiguration::new();
        configuration
            .expect_check_for_update_url()
            .return_const(CHECK_FOR_UPDATE_URL.to_string());
        configuration
            .expect_previous_releases_notes_url()
            .return_const(PREVIOUS_RELEASES_NOTES_URL.to_string());
        configuration
    }

    fn make_application() -> MockApplication {
        let mut application = MockApplication::new();
        application
            .expect_full_version()
            .return_const(CURRENT_VERSION.parse::<Version>().unwrap());
        application
    }

    /// Platform mock; `arch` of None means the architecture must not be asked.
    fn make_platform(os: ProductType, arch: Option<CpuArchitecture>) -> MockPlatformInfo {
        let mut platform = MockPlatformInfo::new();
        platform.expect_product_type().return_const(os);
        match arch {
            Some(arch) => {
                platform
                    .expect_cpu_architecture()
                    .times(1)
                    .return_const(arch);
            }
            None => {
                platform.expect_cpu_architecture().never();
            }
        }
        platform
    }

    fn make_service(
        network: MockNetworkManager,
        platform: MockPlatformInfo,
    ) -> UpdateService<MockNetworkManager, MockPlatformInfo, MockUpdateConfiguration, MockApplication>
    {
        UpdateService::new(network, platform, make_configuration(), make_application())
    }

    async fn check_file_name(os: ProductType, arch: Option<CpuArchitecture>) -> String {
        let service = make_service(make_network(1), make_platform(os, arch));
        service.check_for_update().await.unwrap().file_name
    }

    #[test_log::test(tokio::test)]
    async fn test_parse_release_linux_x86_64() {
        let file_name = check_file_name(ProductType::Linux, Some(CpuArchitecture::X86_64)).await;
        assert_eq!(file_name, "MuseScore.AppImage");
    }

    #[tokio::test]
    async fn test_parse_release_linux_arm() {
        let file_name = check_file_name(ProductType::Linux, Some(CpuArchitecture::Arm)).await;
        assert_eq!(file_name, "MuseScore-arm.AppImage");
    }

    #[tokio::test]
    async fn test_parse_release_linux_aarch64() {
        let file_name = check_file_name(ProductType::Linux, Some(CpuArchitecture::Arm64)).await;
        assert_eq!(file_name, "MuseScore-aarch64.AppImage");
    }

    #[tokio::test]
    async fn test_parse_release_linux_unknown() {
        let file_name = check_file_name(ProductType::Linux, Some(CpuArchitecture::Unknown)).await;
        assert_eq!(file_name, "MuseScore.AppImage");
    }

    #[tokio::test]
    async fn test_parse_release_windows() {
        // Architecture isn't important and must not be queried
        let file_name = check_file_name(ProductType::Windows, None).await;
        assert_eq!(file_name, "MuseScore.msi");
    }

    #[tokio::test]
    async fn test_parse_release_macos() {
        // Architecture isn't important and must not be queried
        let file_name = check_file_name(ProductType::MacOS, None).await;
        assert_eq!(file_name, "MuseScore.dmg");
    }

    #[test_log::test(tokio::test)]
    async fn test_check_for_update_releases_notes() {
        let service = make_service(
            make_network(1),
            make_platform(ProductType::Linux, Some(CpuArchitecture::X86_64)),
        );

        let info = service.check_for_update().await.unwrap();

        // Ascending order, without the running version or older ones
        assert_eq!(
            info.previous_releases_notes,
            vec![
                ReleaseNote::new("40000.3", "blabla3"),
                ReleaseNote::new("40000.4", "blabla4"),
            ]
        );
        assert_eq!(info.version, "5.0");
        assert_eq!(info.file_url, "blabla");
    }

    #[tokio::test]
    async fn test_check_for_update_is_idempotent() {
        let mut platform = MockPlatformInfo::new();
        platform
            .expect_product_type()
            .return_const(ProductType::Linux);
        platform
            .expect_cpu_architecture()
            .times(2)
            .return_const(CpuArchitecture::Arm);
        let service = make_service(make_network(2), platform);

        let first = service.check_for_update().await.unwrap();
        let second = service.check_for_update().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_latest_release_skips_notes_feed() {
        // --- Setup ---
        // Only the first feed may be fetched
        let mut network = MockNetworkManager::new();
        serve(&mut network, CHECK_FOR_UPDATE_URL, "{ not json".to_string(), 1);

        let mut platform = MockPlatformInfo::new();
        platform.expect_product_type().never();
        platform.expect_cpu_architecture().never();

        // --- Execute ---
        let result = make_service(network, platform).check_for_update().await;

        // --- Verify ---
        assert!(matches!(
            result,
            Err(UpdateError::MalformedFeed {
                feed: Feed::LatestRelease,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_malformed_previous_releases() {
        let mut network = MockNetworkManager::new();
        serve(&mut network, CHECK_FOR_UPDATE_URL, RELEASE_FEED.to_string(), 1);
        serve(
            &mut network,
            PREVIOUS_RELEASES_NOTES_URL,
            r#"{ "releases": "none" }"#.to_string(),
            1,
        );

        let result = make_service(network, MockPlatformInfo::new())
            .check_for_update()
            .await;

        assert!(matches!(
            result,
            Err(UpdateError::MalformedFeed {
                feed: Feed::PreviousReleases,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_no_matching_asset() {
        let mut network = MockNetworkManager::new();
        serve(
            &mut network,
            CHECK_FOR_UPDATE_URL,
            r#"{ "tag_name": "v5.0", "assets": [] }"#.to_string(),
            1,
        );
        serve(
            &mut network,
            PREVIOUS_RELEASES_NOTES_URL,
            previous_releases_feed(),
            1,
        );

        let result = make_service(network, make_platform(ProductType::Windows, None))
            .check_for_update()
            .await;

        assert!(matches!(result, Err(UpdateError::NoMatchingAsset { .. })));
    }

    #[tokio::test]
    async fn test_network_failure_is_reported() {
        let mut network = MockNetworkManager::new();
        network
            .expect_get()
            .with(eq(CHECK_FOR_UPDATE_URL), always(), always())
            .times(1)
            .returning(|_, _, _| {
                Err(NetworkError::NonRetryable(NonRetryableError::NotFound {
                    url: CHECK_FOR_UPDATE_URL.into(),
                }))
            });

        let result = make_service(network, MockPlatformInfo::new())
            .check_for_update()
            .await;

        match result {
            Err(UpdateError::NetworkFetchFailed { feed, url, source }) => {
                assert_eq!(feed, Feed::LatestRelease);
                assert_eq!(url, CHECK_FOR_UPDATE_URL);
                assert!(matches!(source, NetworkError::NonRetryable(_)));
            }
            other => panic!("Expected NetworkFetchFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_notes_feed_failure_is_reported() {
        let mut network = MockNetworkManager::new();
        serve(&mut network, CHECK_FOR_UPDATE_URL, RELEASE_FEED.to_string(), 1);
        network
            .expect_get()
            .with(eq(PREVIOUS_RELEASES_NOTES_URL), always(), always())
            .times(1)
            .returning(|_, _, _| Err(NetworkError::Request("connection reset".into())));

        let result = make_service(network, MockPlatformInfo::new())
            .check_for_update()
            .await;

        assert!(matches!(
            result,
            Err(UpdateError::NetworkFetchFailed {
                feed: Feed::PreviousReleases,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_custom_picker() {
        struct LastAssetPicker;

        impl AssetPicker for LastAssetPicker {
            fn pick<'a>(
                &self,
                assets: &'a [ReleaseAsset],
                _platform: &dyn PlatformInfo,
            ) -> Option<&'a ReleaseAsset> {
                assets.last()
            }
        }

        let service = make_service(make_network(1), MockPlatformInfo::new())
            .with_picker(LastAssetPicker);

        let info = service.check_for_update().await.unwrap();
        assert_eq!(info.file_name, "MuseScore-aarch64.AppImage");
    }
}
