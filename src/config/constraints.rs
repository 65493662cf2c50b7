// ABOUTME: Declarative version constraints from configuration.
// ABOUTME: Compiles min/max bounds and a blacklist into a candidate predicate.

use serde::Deserialize;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::rollback::VersionOrdering;
use crate::types::Version;

use super::VersionPredicate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VersionConstraints {
    /// Oldest acceptable rollback target, inclusive.
    #[serde(default)]
    pub min_version: Option<Version>,

    /// Newest acceptable rollback target, inclusive.
    #[serde(default)]
    pub max_version: Option<Version>,

    #[serde(default)]
    pub blacklist: Vec<Version>,
}

impl VersionConstraints {
    pub fn is_empty(&self) -> bool {
        self.min_version.is_none() && self.max_version.is_none() && self.blacklist.is_empty()
    }

    /// Whether `min_version` sorts after `max_version` under `ordering`.
    pub fn is_inverted(&self, ordering: &dyn VersionOrdering) -> bool {
        match (&self.min_version, &self.max_version) {
            (Some(min), Some(max)) => ordering.compare(min, max) == Ordering::Greater,
            _ => false,
        }
    }

    /// Build a predicate accepting only candidates inside the bounds and off
    /// the blacklist. `None` when no constraint is set.
    pub fn predicate(&self, ordering: Arc<dyn VersionOrdering>) -> Option<VersionPredicate> {
        if self.is_empty() {
            return None;
        }
        let constraints = self.clone();
        Some(Arc::new(move |candidate: &Version| {
            constraints.admits(ordering.as_ref(), candidate)
        }))
    }

    fn admits(&self, ordering: &dyn VersionOrdering, candidate: &Version) -> bool {
        let below_min = self
            .min_version
            .as_ref()
            .is_some_and(|min| ordering.compare(candidate, min) == Ordering::Less);
        let above_max = self
            .max_version
            .as_ref()
            .is_some_and(|max| ordering.compare(candidate, max) == Ordering::Greater);

        !below_min && !above_max && !self.blacklist.contains(candidate)
    }
}
