// ABOUTME: Append-only registry of known versions for one service.
// ABOUTME: Keeps versions sorted under a pluggable ordering (lexicographic by default).

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::types::Version;

/// Total order used to sort the registry and to decide "strictly before".
pub trait VersionOrdering: Send + Sync + fmt::Debug {
    fn compare(&self, a: &Version, b: &Version) -> Ordering;
}

/// Plain string comparison. `v9.0.0` sorts after `v10.0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexicographic;

impl VersionOrdering for Lexicographic {
    fn compare(&self, a: &Version, b: &Version) -> Ordering {
        a.as_str().cmp(b.as_str())
    }
}

/// Semantic-version comparison after stripping a leading `v`.
///
/// Versions that do not parse sort before every parsable version and
/// lexicographically among themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Semantic;

impl Semantic {
    fn parse(version: &Version) -> Option<semver::Version> {
        let raw = version.as_str();
        let raw = raw
            .strip_prefix('v')
            .or_else(|| raw.strip_prefix('V'))
            .unwrap_or(raw);
        semver::Version::parse(raw).ok()
    }
}

impl VersionOrdering for Semantic {
    fn compare(&self, a: &Version, b: &Version) -> Ordering {
        match (Self::parse(a), Self::parse(b)) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.as_str().cmp(b.as_str())),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => a.as_str().cmp(b.as_str()),
        }
    }
}

/// Ordering selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingKind {
    #[default]
    Lexicographic,
    Semantic,
}

impl OrderingKind {
    pub fn ordering(self) -> Arc<dyn VersionOrdering> {
        match self {
            OrderingKind::Lexicographic => Arc::new(Lexicographic),
            OrderingKind::Semantic => Arc::new(Semantic),
        }
    }
}

/// Known versions of one service, sorted ascending.
///
/// Duplicates are kept: registering a version twice stores it twice.
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    versions: Vec<Version>,
    ordering: Arc<dyn VersionOrdering>,
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionRegistry {
    pub fn new() -> Self {
        Self::with_ordering(Arc::new(Lexicographic))
    }

    pub fn with_ordering(ordering: Arc<dyn VersionOrdering>) -> Self {
        Self {
            versions: Vec::new(),
            ordering,
        }
    }

    /// Append a version and re-sort the collection.
    pub fn register(&mut self, version: Version) {
        tracing::debug!(version = %version, "registering version");
        self.versions.push(version);
        let ordering = Arc::clone(&self.ordering);
        self.versions.sort_by(|a, b| ordering.compare(a, b));
    }

    /// All versions, ascending.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Whether `candidate` sorts strictly before `current`.
    pub fn precedes(&self, candidate: &Version, current: &Version) -> bool {
        self.ordering.compare(candidate, current) == Ordering::Less
    }

    /// Versions strictly before `current`, nearest first.
    pub fn before<'a>(&'a self, current: &'a Version) -> impl Iterator<Item = &'a Version> + 'a {
        self.versions
            .iter()
            .rev()
            .filter(move |v| self.precedes(v, current))
    }
}
