//! `quickcheck::Arbitrary` instances for the containers.
//!
//! Generation folds a generated entry vector into a fresh container, so an
//! arbitrary instance can never violate the search-tree invariant.
//! Shrinking shrinks that entry vector and rebuilds with the same
//! comparator.

use compare::Compare;
use quickcheck::{Arbitrary, Gen};

use crate::{BstMap, BstSet};

impl<K, V, C> Arbitrary for BstMap<K, V, C>
where
    K: Arbitrary,
    V: Arbitrary,
    C: Compare<K> + Clone + Default + 'static,
{
    fn arbitrary(g: &mut Gen) -> Self {
        let mut map = BstMap::with_cmp(C::default());
        map.extend(Vec::<(K, V)>::arbitrary(g));
        map
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let cmp = self.cmp().clone();
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Box::new(entries.shrink().map(move |entries| {
            let mut map = BstMap::with_cmp(cmp.clone());
            map.extend(entries);
            map
        }))
    }
}

impl<T, C> Arbitrary for BstSet<T, C>
where
    T: Arbitrary,
    C: Compare<T> + Clone + Default + 'static,
{
    fn arbitrary(g: &mut Gen) -> Self {
        let mut set = BstSet::with_cmp(C::default());
        set.extend(Vec::<T>::arbitrary(g));
        set
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let cmp = self.cmp().clone();
        let items: Vec<T> = self.iter().cloned().collect();

        Box::new(items.shrink().map(move |items| {
            let mut set = BstSet::with_cmp(cmp.clone());
            set.extend(items);
            set
        }))
    }
}
