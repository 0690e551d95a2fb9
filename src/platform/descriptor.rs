use serde::Serialize;

use super::{CpuArchitecture, PlatformInfo, ProductType, SystemInfo};

/// A fixed OS family / CPU architecture pair.
///
/// Used when the platform is given explicitly (command-line overrides) rather
/// than detected from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct PlatformDescriptor {
    pub os_family: ProductType,
    pub cpu_architecture: CpuArchitecture,
}

impl PlatformDescriptor {
    pub fn new(os_family: ProductType, cpu_architecture: CpuArchitecture) -> Self {
        Self {
            os_family,
            cpu_architecture,
        }
    }

    /// Snapshot the host platform.
    pub fn detect() -> Self {
        let info = SystemInfo;
        Self::new(info.product_type(), info.cpu_architecture())
    }

    /// Host platform with optional per-field overrides.
    pub fn detect_with(os: Option<ProductType>, arch: Option<CpuArchitecture>) -> Self {
        let host = Self::detect();
        Self::new(
            os.unwrap_or(host.os_family),
            arch.unwrap_or(host.cpu_architecture),
        )
    }
}

impl PlatformInfo for PlatformDescriptor {
    fn product_type(&self) -> ProductType {
        self.os_family
    }

    fn cpu_architecture(&self) -> CpuArchitecture {
        self.cpu_architecture
    }
}
