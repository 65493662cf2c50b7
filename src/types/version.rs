// ABOUTME: Opaque version identifier for a deployed service.
// ABOUTME: Carries no semantics beyond non-emptiness; ordering is chosen by the registry.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("version cannot be empty")]
    Empty,

    #[error("version cannot contain whitespace: '{0}'")]
    Whitespace(String),
}

/// A version identifier such as `v1.4.2` or `2024-06-01-abc123`.
///
/// The derived `Ord` is plain byte-wise string order, so `"v9.0.0" > "v10.0.0"`.
/// Use [`crate::rollback::Semantic`] when that is not what you want.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(value: &str) -> Result<Self, VersionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(VersionError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(VersionError::Whitespace(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a comma-separated list such as `v1.0.0, v1.1.0`. Empty items are skipped.
pub fn parse_version_list(input: &str) -> Result<Vec<Version>, VersionError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Version::new)
        .collect()
}
