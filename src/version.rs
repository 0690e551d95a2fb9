//! Application version parsing and ordering.
//!
//! Versions are dotted numeric identifiers (`4.2.1`, `40000.3`). They are
//! compared component by component as integers, never as strings, and the
//! shorter side is padded with zeros. A `-label` marks a pre-release; a
//! `+build` tail is metadata and takes no part in ordering or equality.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,
    #[error("invalid version component '{component}' in '{input}'")]
    InvalidComponent { input: String, component: String },
}

/// A dotted numeric version with an optional pre-release label and build
/// metadata.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
    label: Option<String>,
    build: Option<String>,
}

impl Version {
    pub fn new(components: Vec<u64>) -> Self {
        Self {
            components,
            label: None,
            build: None,
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Pre-release label, e.g. `beta` in `4.0.0-beta`.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Build metadata, e.g. `1234` in `4.2.1+1234`.
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.label.is_some()
    }

    fn compare_components(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let (rest, build) = match trimmed.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (trimmed, None),
        };
        let (numeric, label) = match rest.split_once('-') {
            Some((numeric, label)) => (numeric, Some(label)),
            None => (rest, None),
        };

        let components = numeric
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| VersionError::InvalidComponent {
                        input: s.to_string(),
                        component: part.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            components,
            label: label.filter(|l| !l.is_empty()).map(str::to_string),
            build: build.filter(|b| !b.is_empty()).map(str::to_string),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeric = self
            .components
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", numeric)?;
        if let Some(label) = &self.label {
            write!(f, "-{}", label)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.compare_components(other) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // A release ranks above any of its pre-releases
        match (&self.label, &other.label) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
