//! An ordered set based on an unbalanced binary search tree.

use compare::{Compare, Natural};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Bound;

use crate::map::{self, BstMap};

/// An ordered set whose items are sorted by a comparator.
///
/// A thin wrapper around [`BstMap`] with unit values, sharing its tree and
/// its performance characteristics.  Items are immutable once stored;
/// mutating an item in place could break the ordering invariant, so no
/// `_mut` accessors exist.
///
/// # Examples
///
/// ```
/// use bst_collections::BstSet;
///
/// let mut set = BstSet::new();
/// assert!(set.insert(2));
/// assert!(set.insert(1));
/// assert!(!set.insert(2));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.succ(&1), Some(&2));
///
/// let items: Vec<i32> = set.into_iter().collect();
/// assert_eq!(items, [1, 2]);
/// ```
#[derive(Clone)]
pub struct BstSet<T, C = Natural<T>>(BstMap<T, (), C>);

impl<T: Ord> BstSet<T> {
    /// Creates an empty set ordered by the items' natural order.
    pub fn new() -> Self {
        BstSet(BstMap::new())
    }
}

impl<T, C> BstSet<T, C>
where
    C: Compare<T>,
{
    /// Creates an empty set ordered by `cmp`.
    pub fn with_cmp(cmp: C) -> Self {
        BstSet(BstMap::with_cmp(cmp))
    }

    /// Returns the set's comparator.
    pub fn cmp(&self) -> &C {
        self.0.cmp()
    }

    /// Returns true if the set contains no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of items in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Inserts `item`, returning true if it was not already present.
    ///
    /// An equal item already in the set is replaced by `item`.
    pub fn insert(&mut self, item: T) -> bool {
        self.0.insert(item, ()).is_none()
    }

    /// Removes `item`, returning true if it was present.
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.remove(item).is_some()
    }

    /// Returns true if the set contains `item`.
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.contains_key(item)
    }

    /// Returns a reference to the stored item equal to `item`.
    pub fn get<Q>(&self, item: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.pred_or_eq(item).and_then(|(stored, _)| {
            self.cmp().compares_eq(item, stored).then_some(stored)
        })
    }

    /// Returns the least item.
    ///
    /// Named in std's first/last vocabulary: a plain `min` method would be
    /// shadowed by `Ord::min`, which every set implements.
    pub fn first(&self) -> Option<&T> {
        self.0.first_key_value().map(|(item, _)| item)
    }

    /// Returns the greatest item.
    pub fn last(&self) -> Option<&T> {
        self.0.last_key_value().map(|(item, _)| item)
    }

    /// Removes and returns the least item.
    pub fn pop_first(&mut self) -> Option<T> {
        self.0.pop_first().map(|(item, _)| item)
    }

    /// Removes and returns the greatest item.
    pub fn pop_last(&mut self) -> Option<T> {
        self.0.pop_last().map(|(item, _)| item)
    }

    /// Returns the greatest item strictly below `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstSet;
    ///
    /// let set: BstSet<i32> = [1, 3, 5].into_iter().collect();
    ///
    /// assert_eq!(set.pred(&4), Some(&3));
    /// assert_eq!(set.pred(&3), Some(&1));
    /// assert_eq!(set.pred_or_eq(&3), Some(&3));
    /// assert_eq!(set.pred(&1), None);
    /// ```
    pub fn pred<Q>(&self, item: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.pred(item).map(|(found, _)| found)
    }

    /// Like [`pred`](Self::pred), but an exact match is returned as is.
    pub fn pred_or_eq<Q>(&self, item: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.pred_or_eq(item).map(|(found, _)| found)
    }

    /// Returns the least item strictly above `item`.
    pub fn succ<Q>(&self, item: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.succ(item).map(|(found, _)| found)
    }

    /// Like [`succ`](Self::succ), but an exact match is returned as is.
    pub fn succ_or_eq<Q>(&self, item: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.succ_or_eq(item).map(|(found, _)| found)
    }

    /// Removes and returns the greatest item strictly below `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstSet;
    ///
    /// let mut set: BstSet<i32> = [1, 2, 3].into_iter().collect();
    ///
    /// assert_eq!(set.remove_pred(&1), None);
    /// assert_eq!(set.remove_pred(&2), Some(1));
    /// assert_eq!(set.remove_pred_or_eq(&2), Some(2));
    /// ```
    pub fn remove_pred<Q>(&mut self, item: &Q) -> Option<T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.remove_pred(item).map(|(found, _)| found)
    }

    /// Like [`remove_pred`](Self::remove_pred), but an exact match is
    /// removed instead.
    pub fn remove_pred_or_eq<Q>(&mut self, item: &Q) -> Option<T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.remove_pred_or_eq(item).map(|(found, _)| found)
    }

    /// Removes and returns the least item strictly above `item`.
    pub fn remove_succ<Q>(&mut self, item: &Q) -> Option<T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.remove_succ(item).map(|(found, _)| found)
    }

    /// Like [`remove_succ`](Self::remove_succ), but an exact match is
    /// removed instead.
    pub fn remove_succ_or_eq<Q>(&mut self, item: &Q) -> Option<T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.0.remove_succ_or_eq(item).map(|(found, _)| found)
    }

    /// Returns a double-ended iterator over the items in order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.0.iter())
    }

    /// Returns a double-ended iterator over the items within the given
    /// bounds.
    pub fn range<Lo, Hi>(
        &self,
        lower: Bound<&Lo>,
        upper: Bound<&Hi>,
    ) -> Range<'_, T>
    where
        C: Compare<Lo, T> + Compare<Hi, T>,
        Lo: ?Sized,
        Hi: ?Sized,
    {
        Range(self.0.range(lower, upper))
    }

    /// Consumes the set and returns a double-ended iterator over the owned
    /// items within the given bounds.
    pub fn into_range<Lo, Hi>(
        self,
        lower: Bound<&Lo>,
        upper: Bound<&Hi>,
    ) -> IntoRange<T>
    where
        C: Compare<Lo, T> + Compare<Hi, T>,
        Lo: ?Sized,
        Hi: ?Sized,
    {
        IntoRange(self.0.into_range(lower, upper))
    }

    /// Verifies the search-tree invariants.  See [`BstMap::check`].
    pub fn check(&self) -> Result<(), &'static str> {
        self.0.check()
    }
}

impl<T, C> Default for BstSet<T, C>
where
    C: Compare<T> + Default,
{
    fn default() -> Self {
        BstSet(BstMap::default())
    }
}

impl<T, C> Extend<T> for BstSet<T, C>
where
    C: Compare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, it: I) {
        for item in it {
            self.insert(item);
        }
    }
}

impl<T, C> FromIterator<T> for BstSet<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(it: I) -> Self {
        let mut set = BstSet::default();
        set.extend(it);
        set
    }
}

impl<T, C> fmt::Debug for BstSet<T, C>
where
    T: fmt::Debug,
    C: Compare<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Hash for BstSet<T, C>
where
    T: Hash,
    C: Compare<T>,
{
    fn hash<H: Hasher>(&self, h: &mut H) {
        for item in self.iter() {
            item.hash(h);
        }
    }
}

impl<T, C> PartialEq for BstSet<T, C>
where
    C: Compare<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T, C> Eq for BstSet<T, C> where C: Compare<T> {}

impl<T, C> PartialOrd for BstSet<T, C>
where
    C: Compare<T>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<T, C> Ord for BstSet<T, C>
where
    C: Compare<T>,
{
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(&self.0, &other.0)
    }
}

impl<'a, T, C> IntoIterator for &'a BstSet<T, C>
where
    C: Compare<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for BstSet<T, C>
where
    C: Compare<T>,
{
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self.0.into_iter())
    }
}

/// A double-ended iterator over a set's items.
pub struct Iter<'a, T>(map::Iter<'a, T, ()>);

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter(self.0.clone())
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.0.next().map(|(item, _)| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(item, _)| item)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// A double-ended iterator over a set's owned items.
pub struct IntoIter<T>(map::IntoIter<T, ()>);

impl<T: Clone> Clone for IntoIter<T> {
    fn clone(&self) -> Self {
        IntoIter(self.0.clone())
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.next().map(|(item, _)| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.0.next_back().map(|(item, _)| item)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

/// A double-ended iterator over the items in a range.
pub struct Range<'a, T>(map::Range<'a, T, ()>);

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range(self.0.clone())
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.0.next().map(|(item, _)| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for Range<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(item, _)| item)
    }
}

impl<T> FusedIterator for Range<'_, T> {}

/// A double-ended iterator over the owned items in a range.
pub struct IntoRange<T>(map::IntoRange<T, ()>);

impl<T: Clone> Clone for IntoRange<T> {
    fn clone(&self) -> Self {
        IntoRange(self.0.clone())
    }
}

impl<T> Iterator for IntoRange<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.next().map(|(item, _)| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoRange<T> {
    fn next_back(&mut self) -> Option<T> {
        self.0.next_back().map(|(item, _)| item)
    }
}

impl<T> FusedIterator for IntoRange<T> {}
