//! Update checking.
//!
//! [`UpdateService`] fetches the latest-release and previous-releases feeds
//! and resolves them for the running platform and version. Resolution itself
//! is pure and lives in [`resolver`].

mod error;
pub mod resolver;
mod service;

pub use error::{Feed, UpdateError, UpdateResult};
pub use resolver::{
    parse_latest_release, parse_previous_releases, reconcile_notes, resolve_release,
    resolve_release_with, select_asset,
};
pub use service::UpdateService;
