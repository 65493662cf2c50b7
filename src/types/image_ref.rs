// ABOUTME: Container image reference parsing for backend version introspection.
// ABOUTME: Extracts the deployed version (tag) from refs like registry/app:v1@sha256:...

use std::fmt;
use thiserror::Error;

use super::{Version, VersionError};

/// Tag assumed when an image reference carries none.
pub const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("invalid version in image reference: {0}")]
    Version(#[from] VersionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !"/:.-_@".contains(*c))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        let (without_digest, digest) = match input.split_once('@') {
            Some((before, after)) => (before, Some(after.to_string())),
            None => (input, None),
        };

        // A colon followed by a slash belongs to a registry port, not a tag.
        let (repository, tag) = match without_digest.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => (before, Some(after.to_string())),
            _ => (without_digest, None),
        };

        Ok(Self {
            repository: repository.to_string(),
            tag,
            digest,
        })
    }

    /// Repository including any registry host, e.g. `ghcr.io/org/app`.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The deployed version: the tag, or `latest` when there is none.
    pub fn version(&self) -> Result<Version, ParseImageRefError> {
        Ok(Version::new(self.tag().unwrap_or(DEFAULT_TAG))?)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repository)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}
