//! Application identity: the version of the running instance.

use crate::version::Version;

#[cfg_attr(test, mockall::automock)]
pub trait Application: Send + Sync {
    /// Full version of the running application
    fn full_version(&self) -> Version;
}

#[derive(Debug, Clone)]
pub struct AppIdentity {
    version: Version,
}

impl AppIdentity {
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Identity of this build.
    pub fn current() -> Self {
        let version = env!("CARGO_PKG_VERSION")
            .parse()
            .unwrap_or_else(|_| Version::new(vec![0]));
        Self { version }
    }
}

impl Application for AppIdentity {
    fn full_version(&self) -> Version {
        self.version.clone()
    }
}
