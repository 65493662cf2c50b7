// ABOUTME: Property tests for the version registry and stable version selector.
// ABOUTME: Sortedness, duplicate retention, and selection bounds under random input.

use proptest::prelude::*;
use std::sync::Arc;

use stable_galaxy::rollback::{
    ErrorKind, Lexicographic, Semantic, StableVersionSelector, VersionOrdering, VersionRegistry,
};
use stable_galaxy::types::Version;

fn version_strategy() -> impl Strategy<Value = Version> {
    prop_oneof![
        (0u64..20, 0u64..20, 0u64..20)
            .prop_map(|(a, b, c)| Version::new(&format!("v{a}.{b}.{c}")).unwrap()),
        "[a-z0-9]{1,8}".prop_map(|s| Version::new(&s).unwrap()),
    ]
}

fn registry_with(ordering: Arc<dyn VersionOrdering>, versions: &[Version]) -> VersionRegistry {
    let mut registry = VersionRegistry::with_ordering(ordering);
    for version in versions {
        registry.register(version.clone());
    }
    registry
}

proptest! {
    #[test]
    fn registry_stays_sorted_and_keeps_everything(
        versions in prop::collection::vec(version_strategy(), 0..40),
    ) {
        let orderings: [Arc<dyn VersionOrdering>; 2] =
            [Arc::new(Lexicographic), Arc::new(Semantic)];
        for ordering in orderings {
            let registry = registry_with(Arc::clone(&ordering), &versions);

            prop_assert_eq!(registry.len(), versions.len());
            for pair in registry.versions().windows(2) {
                prop_assert!(ordering.compare(&pair[0], &pair[1]).is_le());
            }
        }
    }

    #[test]
    fn selection_is_the_greatest_strictly_smaller_version(
        versions in prop::collection::vec(version_strategy(), 0..40),
        current in version_strategy(),
    ) {
        let registry = registry_with(Arc::new(Lexicographic), &versions);
        let selector = StableVersionSelector::new(&registry, None);
        let expected = versions.iter().filter(|v| *v < &current).max();

        match (selector.select_previous(&current), expected) {
            (Ok(selected), Some(expected)) => prop_assert_eq!(&selected, expected),
            (Err(err), None) => prop_assert_eq!(err.kind(), ErrorKind::Validation),
            (got, expected) => prop_assert!(false, "got {:?}, expected {:?}", got, expected),
        }
    }

    #[test]
    fn rejected_versions_are_never_selected(
        versions in prop::collection::vec(version_strategy(), 1..40),
        current in version_strategy(),
    ) {
        let banned = versions[0].clone();
        let registry = registry_with(Arc::new(Semantic), &versions);
        let predicate: stable_galaxy::config::VersionPredicate = {
            let banned = banned.clone();
            Arc::new(move |candidate: &Version| candidate != &banned)
        };
        let selector = StableVersionSelector::new(&registry, Some(&predicate));

        if let Ok(selected) = selector.select_previous(&current) {
            prop_assert_ne!(&selected, &banned);
            prop_assert!(registry.precedes(&selected, &current));
        }
    }
}
