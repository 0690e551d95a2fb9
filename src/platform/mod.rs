//! Platform detection module
//!
//! This module provides abstractions for querying the operating system family
//! and CPU architecture of the running instance. The architecture query is a
//! separate call so callers can skip it when it doesn't matter.

mod descriptor;
mod detection;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub use descriptor::PlatformDescriptor;
pub use detection::SystemInfo;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Windows,
    MacOS,
    Linux,
    #[default]
    Unknown,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Windows => write!(f, "windows"),
            ProductType::MacOS => write!(f, "macos"),
            ProductType::Linux => write!(f, "linux"),
            ProductType::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for ProductType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" => Ok(ProductType::Windows),
            "macos" | "darwin" | "osx" => Ok(ProductType::MacOS),
            "linux" => Ok(ProductType::Linux),
            "unknown" => Ok(ProductType::Unknown),
            _ => anyhow::bail!(
                "Unknown OS family: {}. Expected windows, macos, linux, or unknown.",
                s
            ),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CpuArchitecture {
    #[serde(rename = "x86_64")]
    X86_64,
    Arm,
    Arm64,
    #[default]
    Unknown,
}

impl fmt::Display for CpuArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuArchitecture::X86_64 => write!(f, "x86_64"),
            CpuArchitecture::Arm => write!(f, "arm"),
            CpuArchitecture::Arm64 => write!(f, "arm64"),
            CpuArchitecture::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for CpuArchitecture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Ok(CpuArchitecture::X86_64),
            "arm" | "armv7" | "armhf" => Ok(CpuArchitecture::Arm),
            "arm64" | "aarch64" => Ok(CpuArchitecture::Arm64),
            "unknown" => Ok(CpuArchitecture::Unknown),
            _ => anyhow::bail!(
                "Unknown CPU architecture: {}. Expected x86_64, arm, arm64, or unknown.",
                s
            ),
        }
    }
}

/// Trait for querying the running platform (useful for testing)
#[cfg_attr(test, mockall::automock)]
pub trait PlatformInfo: Send + Sync {
    fn product_type(&self) -> ProductType;
    fn cpu_architecture(&self) -> CpuArchitecture;
}
