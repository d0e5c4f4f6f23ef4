//! Property-based tests for the two set representations: boolean-algebra
//! laws on random sets, element iteration round trips, and agreement
//! between the fast and wide variants on the narrow range they share.

use proptest::prelude::*;

use dedekind::algebra::{SmallSet, WideSet, MAX_ELEMENT};

fn small_strategy() -> impl Strategy<Value = SmallSet> {
    prop::collection::btree_set(1u8..=MAX_ELEMENT, 0..=6)
        .prop_map(|elements| SmallSet::from_elements(elements).unwrap())
}

fn wide_strategy() -> impl Strategy<Value = WideSet> {
    prop::collection::btree_set(1u16..=256, 0..=8)
        .prop_map(|elements| WideSet::from_elements(elements).unwrap())
}

proptest! {
    #[test]
    fn small_set_boolean_laws(a in small_strategy(), b in small_strategy(), c in small_strategy()) {
        prop_assert_eq!(a.union(b), b.union(a));
        prop_assert_eq!(a.intersection(b), b.intersection(a));
        prop_assert_eq!(a.union(b).union(c), a.union(b.union(c)));
        prop_assert_eq!(a.union(a.intersection(b)), a);
        prop_assert_eq!(a.intersection(a.union(b)), a);
        prop_assert_eq!(a.minus(b).union(a.intersection(b)), a);
        prop_assert!(a.intersection(b).is_subset_of(a));
        prop_assert!(a.is_subset_of(a.union(b)));
    }

    #[test]
    fn subset_is_a_partial_order(a in small_strategy(), b in small_strategy()) {
        prop_assert!(a.is_subset_of(a));
        if a.is_subset_of(b) && b.is_subset_of(a) {
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn small_elements_round_trip(a in small_strategy()) {
        let rebuilt = SmallSet::from_elements(a.iter()).unwrap();
        prop_assert_eq!(rebuilt, a);
        prop_assert_eq!(a.iter().count() as u32, a.len());
        prop_assert_eq!(a.iter().last(), a.largest());
    }

    #[test]
    fn subsets_are_subsets_and_complete(a in small_strategy()) {
        let subs: Vec<SmallSet> = a.subsets().collect();
        prop_assert_eq!(subs.len(), 1usize << a.len());
        for s in &subs {
            prop_assert!(s.is_subset_of(a));
        }
    }

    #[test]
    fn wide_set_boolean_laws(a in wide_strategy(), b in wide_strategy()) {
        prop_assert_eq!(a.union(b), b.union(a));
        prop_assert_eq!(a.union(a.intersection(b)), a);
        prop_assert_eq!(a.minus(b).union(a.intersection(b)), a);
        prop_assert!(a.intersection(b).is_subset_of(a));
    }

    #[test]
    fn wide_elements_round_trip(a in wide_strategy()) {
        let rebuilt = WideSet::from_elements(a.iter()).unwrap();
        prop_assert_eq!(rebuilt, a);
        prop_assert_eq!(a.iter().count() as u32, a.len());
        prop_assert_eq!(a.iter().last(), a.largest());
    }

    #[test]
    fn wide_agrees_with_small_on_the_narrow_range(a in small_strategy(), b in small_strategy()) {
        let wa = WideSet::from_elements(a.iter().map(u16::from)).unwrap();
        let wb = WideSet::from_elements(b.iter().map(u16::from)).unwrap();
        let union: Vec<u16> = wa.union(wb).iter().collect();
        let small_union: Vec<u16> = a.union(b).iter().map(u16::from).collect();
        prop_assert_eq!(union, small_union);
        prop_assert_eq!(wa.is_subset_of(wb), a.is_subset_of(b));
    }
}
