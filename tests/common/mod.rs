use proptest::prelude::*;
use std::ops::Bound;

// assert_eq over any number of expressions, comparing each against the first
macro_rules! assert_eq_all {
    ($lhs:expr, $($rhs:expr),+ $(,)?) => {{
        let lhs = &$lhs;
        $(assert_eq!(*lhs, $rhs);)+
    }};
}
pub(crate) use assert_eq_all;

pub(crate) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

#[allow(dead_code)]
pub(crate) type SmallIntPairs = Vec<(u16, u16)>;

#[allow(dead_code)]
pub(crate) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

#[allow(dead_code)]
pub(crate) fn small_ints() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(0u16..1024u16, 0..512)
}

/// Bound pairs over the 0..1024 key domain, arranged so that the lower
/// bound never exceeds the upper one (std's `range` panics on inverted or
/// double-excluded-equal bounds).
pub(crate) fn range_bounds_1k(
) -> impl Strategy<Value = (Bound<u16>, Bound<u16>)> {
    use Bound::*;

    (1u16..1023)
        .prop_flat_map(|n| {
            (
                prop_oneof![
                    Just(Bound::Unbounded),
                    (0u16..=n).prop_map(Bound::Excluded),
                    (0u16..=n).prop_map(Bound::Included),
                ],
                prop_oneof![
                    Just(Bound::Unbounded),
                    (n..1024).prop_map(Bound::Excluded),
                    (n..1024).prop_map(Bound::Included),
                ],
            )
        })
        .prop_map(|(lb, ub)| match (lb, ub) {
            (Excluded(x), Excluded(y)) if x == y => (Included(x), Excluded(y)),
            xy => xy,
        })
}

/// Borrows a bound so it can be handed to the `bst_collections` range
/// methods, which take `Bound<&K>`.
pub(crate) fn ref_bound<K>(bound: &Bound<K>) -> Bound<&K> {
    match bound {
        Bound::Unbounded => Bound::Unbounded,
        Bound::Included(k) => Bound::Included(k),
        Bound::Excluded(k) => Bound::Excluded(k),
    }
}
