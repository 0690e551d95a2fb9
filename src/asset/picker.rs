use log::debug;

use crate::platform::{CpuArchitecture, PlatformInfo, ProductType};
use crate::release::ReleaseAsset;

const MACOS_SUFFIX: &str = ".dmg";
const WINDOWS_SUFFIX: &str = ".msi";
const LINUX_SUFFIX: &str = ".AppImage";
const LINUX_ARM_SUFFIX: &str = "-arm.AppImage";
const LINUX_AARCH64_SUFFIX: &str = "-aarch64.AppImage";

/// Trait for selecting an asset from a list of available assets
pub trait AssetPicker: Send + Sync {
    /// Pick the installer for the given platform
    ///
    /// Returns `None` if no suitable asset is found
    fn pick<'a>(
        &self,
        assets: &'a [ReleaseAsset],
        platform: &dyn PlatformInfo,
    ) -> Option<&'a ReleaseAsset>;
}

/// Picks installers by file name suffix.
///
/// | OS      | Architecture      | Suffix              |
/// |---------|-------------------|---------------------|
/// | macOS   | any               | `.dmg`              |
/// | Windows | any               | `.msi`              |
/// | Linux   | arm               | `-arm.AppImage`     |
/// | Linux   | arm64             | `-aarch64.AppImage` |
/// | Linux   | x86_64 or unknown | `.AppImage`         |
///
/// The architecture is only queried on Linux.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformAssetPicker;

impl PlatformAssetPicker {
    pub fn new() -> Self {
        Self
    }

    fn rule(platform: &dyn PlatformInfo) -> Option<Rule> {
        match platform.product_type() {
            ProductType::MacOS => Some(Rule::Suffix(MACOS_SUFFIX)),
            ProductType::Windows => Some(Rule::Suffix(WINDOWS_SUFFIX)),
            ProductType::Linux => match platform.cpu_architecture() {
                CpuArchitecture::Arm => Some(Rule::Suffix(LINUX_ARM_SUFFIX)),
                CpuArchitecture::Arm64 => Some(Rule::Suffix(LINUX_AARCH64_SUFFIX)),
                CpuArchitecture::X86_64 | CpuArchitecture::Unknown => Some(Rule::PlainAppImage),
            },
            ProductType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Rule {
    Suffix(&'static str),
    /// An AppImage without an architecture suffix
    PlainAppImage,
}

impl Rule {
    fn matches(&self, name: &str) -> bool {
        match self {
            Rule::Suffix(suffix) => name.ends_with(suffix),
            Rule::PlainAppImage => {
                name.ends_with(LINUX_SUFFIX)
                    && !name.ends_with(LINUX_ARM_SUFFIX)
                    && !name.ends_with(LINUX_AARCH64_SUFFIX)
            }
        }
    }
}

impl AssetPicker for PlatformAssetPicker {
    fn pick<'a>(
        &self,
        assets: &'a [ReleaseAsset],
        platform: &dyn PlatformInfo,
    ) -> Option<&'a ReleaseAsset> {
        let Some(rule) = Self::rule(platform) else {
            debug!("No installer rule for this OS family");
            return None;
        };

        let picked = assets.iter().find(|a| rule.matches(&a.name));
        debug!("Picked asset: {:?}", picked.map(|a| &a.name));
        picked
    }
}
