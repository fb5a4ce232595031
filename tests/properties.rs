//! Property-based coverage for the quantified invariants around coordinate
//! subset matching and specificity, independent of any particular resolver
//! wiring.

use locus_config::Coordinates;
use proptest::prelude::*;

fn coordinate_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-c]", "[x-z]").prop_map(|(k, v)| (k.to_string(), v.to_string())), 0..4)
}

proptest! {
    /// The empty coordinate set is a subset of any coordinate set (spec's
    /// base case for the resolver's subset-match classification).
    #[test]
    fn empty_is_always_a_subset(pairs in coordinate_pairs()) {
        let other: Coordinates = pairs.into_iter().collect();
        prop_assert!(Coordinates::new().is_subset_of(&other));
    }

    /// A coordinate set is always a subset of itself.
    #[test]
    fn a_set_is_a_subset_of_itself(pairs in coordinate_pairs()) {
        let coords: Coordinates = pairs.into_iter().collect();
        prop_assert!(coords.is_subset_of(&coords));
    }

    /// Specificity is exactly the number of distinct keys supplied, matching
    /// the resolver's use of `len()` as the ranking key.
    #[test]
    fn specificity_equals_distinct_key_count(pairs in coordinate_pairs()) {
        let mut keys: Vec<_> = pairs.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys.dedup();
        let coords: Coordinates = pairs.into_iter().collect();
        prop_assert_eq!(coords.len(), keys.len());
    }

    /// A proper superset (one extra coordinate) is never a subset of the
    /// smaller set, unless the extra key happens to collide with an
    /// existing one and overwrite it to an identical mapping.
    #[test]
    fn adding_a_new_key_breaks_subset_in_the_other_direction(pairs in coordinate_pairs()) {
        let base: Coordinates = pairs.into_iter().collect();
        let extended = base.clone().with("extra-key-not-in-base", "v");
        prop_assert!(!extended.is_subset_of(&base));
        prop_assert!(base.is_subset_of(&extended));
    }
}
