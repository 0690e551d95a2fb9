//! Asset selection module
//!
//! This module provides abstractions for selecting which installer to offer
//! from a release based on the running platform.

mod picker;

pub use picker::{AssetPicker, PlatformAssetPicker};

