// ABOUTME: Stable version selection over the registry.
// ABOUTME: Picks the nearest version before the failing one that the validator accepts.

use crate::config::VersionPredicate;
use crate::types::Version;

use super::error::RollbackError;
use super::registry::VersionRegistry;

pub const NO_STABLE_VERSION: &str = "no stable previous version found";

/// Finds the rollback target for a failing version.
pub struct StableVersionSelector<'a> {
    registry: &'a VersionRegistry,
    validate: Option<&'a VersionPredicate>,
}

impl<'a> StableVersionSelector<'a> {
    pub fn new(registry: &'a VersionRegistry, validate: Option<&'a VersionPredicate>) -> Self {
        Self { registry, validate }
    }

    /// Scan from the greatest registered version downward and return the first
    /// one strictly before `current` that the validator (if any) accepts.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when no candidate qualifies, including when
    /// the registry is empty.
    pub fn select_previous(&self, current: &Version) -> Result<Version, RollbackError> {
        tracing::debug!(current_version = %current, "finding previous stable version");

        for candidate in self.registry.before(current) {
            if self.validate.is_some_and(|validate| !validate(candidate)) {
                tracing::debug!(version = %candidate, "version rejected by validator");
                continue;
            }
            tracing::debug!(found_version = %candidate, "found stable version");
            return Ok(candidate.clone());
        }

        Err(RollbackError::validation(NO_STABLE_VERSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollback::ErrorKind;
    use std::sync::Arc;

    fn v(s: &str) -> Version {
        Version::new(s).unwrap()
    }

    fn registry(versions: &[&str]) -> VersionRegistry {
        let mut registry = VersionRegistry::new();
        for s in versions {
            registry.register(v(s));
        }
        registry
    }

    #[test]
    fn selects_nearest_preceding() {
        let registry = registry(&["v0.9.0", "v1.0.0"]);
        let selector = StableVersionSelector::new(&registry, None);

        assert_eq!(selector.select_previous(&v("v1.0.0")).unwrap(), v("v0.9.0"));
    }

    #[test]
    fn empty_registry_fails_with_validation() {
        let registry = VersionRegistry::new();
        let selector = StableVersionSelector::new(&registry, None);

        let err = selector.select_previous(&v("v1.0.0")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), NO_STABLE_VERSION);
    }

    #[test]
    fn nothing_earlier_fails() {
        let registry = registry(&["v1.0.0", "v1.1.0"]);
        let selector = StableVersionSelector::new(&registry, None);

        assert!(selector.select_previous(&v("v1.0.0")).is_err());
    }

    #[test]
    fn validator_skips_rejected_candidates() {
        let registry = registry(&["v0.8.0", "v0.9.0", "v1.0.0"]);
        let reject_090: VersionPredicate =
            Arc::new(|candidate: &Version| candidate.as_str() != "v0.9.0");
        let selector = StableVersionSelector::new(&registry, Some(&reject_090));

        assert_eq!(selector.select_previous(&v("v1.0.0")).unwrap(), v("v0.8.0"));
    }

    #[test]
    fn validator_rejecting_everything_fails() {
        let registry = registry(&["v0.8.0", "v0.9.0", "v1.0.0"]);
        let reject_all: VersionPredicate = Arc::new(|_: &Version| false);
        let selector = StableVersionSelector::new(&registry, Some(&reject_all));

        let err = selector.select_previous(&v("v1.0.0")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn current_version_need_not_be_registered() {
        let registry = registry(&["v0.9.0", "v1.0.0"]);
        let selector = StableVersionSelector::new(&registry, None);

        assert_eq!(selector.select_previous(&v("v1.0.5")).unwrap(), v("v1.0.0"));
    }
}
