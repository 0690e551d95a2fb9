use super::{CpuArchitecture, PlatformInfo, ProductType};

/// Host platform information using compile-time detection
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInfo;

impl SystemInfo {
    fn detect_product_type() -> ProductType {
        #[cfg(target_os = "macos")]
        {
            ProductType::MacOS
        }
        #[cfg(target_os = "linux")]
        {
            ProductType::Linux
        }
        #[cfg(target_os = "windows")]
        {
            ProductType::Windows
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            ProductType::Unknown
        }
    }

    fn detect_cpu_architecture() -> CpuArchitecture {
        #[cfg(target_arch = "x86_64")]
        {
            CpuArchitecture::X86_64
        }
        #[cfg(target_arch = "aarch64")]
        {
            CpuArchitecture::Arm64
        }
        #[cfg(target_arch = "arm")]
        {
            CpuArchitecture::Arm
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "arm")))]
        {
            CpuArchitecture::Unknown
        }
    }
}

impl PlatformInfo for SystemInfo {
    #[tracing::instrument(skip(self))]
    fn product_type(&self) -> ProductType {
        Self::detect_product_type()
    }

    #[tracing::instrument(skip(self))]
    fn cpu_architecture(&self) -> CpuArchitecture {
        Self::detect_cpu_architecture()
    }
}
