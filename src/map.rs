//! An ordered map based on an unbalanced binary search tree.

use compare::{natural, Compare, Natural};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops;
use std::ops::Bound;

use crate::iter::{InOrder, InOrderRange, MutFrame, RefFrame};
use crate::node::{self, Link, Node};

/// An ordered map whose keys are sorted by a comparator.
///
/// The map is backed by a plain binary search tree.  Nothing rebalances the
/// tree, so every operation is O(height): O(log n) for random-ish insertion
/// orders and O(n) in the worst case.
///
/// The comparator is fixed at construction.  All keys handed to the map
/// afterwards must be totally ordered by it; feeding it keys it cannot order
/// consistently leaves lookups unreliable, though never unsound.
///
/// # Examples
///
/// ```
/// use bst_collections::BstMap;
///
/// let mut map = BstMap::new();
/// map.insert(2, "b");
/// map.insert(1, "a");
/// map.insert(3, "c");
///
/// assert_eq!(map.get(&2), Some(&"b"));
/// assert_eq!(map.first_key_value(), Some((&1, &"a")));
/// assert_eq!(map.succ(&1), Some((&2, &"b")));
///
/// let keys: Vec<i32> = map.iter().map(|(&k, _)| k).collect();
/// assert_eq!(keys, [1, 2, 3]);
/// ```
pub struct BstMap<K, V, C = Natural<K>> {
    root: Link<K, V>,
    len: usize,
    cmp: C,
}

impl<K: Ord, V> BstMap<K, V> {
    /// Creates an empty map ordered by the keys' natural order.
    pub fn new() -> Self {
        BstMap::with_cmp(natural())
    }
}

impl<K, V, C> BstMap<K, V, C>
where
    C: Compare<K>,
{
    /// Creates an empty map ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstMap;
    /// use compare::{natural, Compare};
    ///
    /// let mut map = BstMap::with_cmp(natural().rev());
    /// map.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    ///
    /// // greatest key first under the reversed order
    /// assert_eq!(map.first_key_value(), Some((&3, &'c')));
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        BstMap {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Returns the map's comparator.
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        node::drop_tree(self.root.take());
        self.len = 0;
    }

    /// Inserts an entry, returning the previous value for an equal key.
    ///
    /// An equal key is itself replaced by `key`; the two may be
    /// distinguishable even though the comparator equates them.
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        let old = node::insert(&mut self.root, &self.cmp, key, val);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Removes the entry for `key`, returning it if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let entry = node::remove(&mut self.root, &self.cmp, key);
        if entry.is_some() {
            self.len -= 1;
        }
        entry
    }

    /// Returns true if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value associated with `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::get(&self.root, &self.cmp, key).map(|node| &node.val)
    }

    /// Returns a mutable reference to the value associated with `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::get_mut(&mut self.root, &self.cmp, key)
    }

    /// Returns the entry with the least key.
    ///
    /// Named in std's first/last vocabulary: a plain `min` method would be
    /// shadowed by `Ord::min` whenever the map itself is `Ord`.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        node::min(&self.root).map(Node::entry)
    }

    /// Returns the entry with the greatest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        node::max(&self.root).map(Node::entry)
    }

    /// Returns the entry with the least key, with a mutable value reference.
    pub fn first_key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        node::min_mut(&mut self.root)
    }

    /// Returns the entry with the greatest key, with a mutable value
    /// reference.
    pub fn last_key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        node::max_mut(&mut self.root)
    }

    /// Removes and returns the entry with the least key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let node = node::detach_min(&mut self.root)?;
        self.len -= 1;
        let node = *node;
        Some((node.key, node.val))
    }

    /// Removes and returns the entry with the greatest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let node = node::detach_max(&mut self.root)?;
        self.len -= 1;
        let node = *node;
        Some((node.key, node.val))
    }

    /// Returns the entry with the greatest key strictly below `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.extend([(1, 'a'), (3, 'c'), (5, 'e')]);
    ///
    /// assert_eq!(map.pred(&4), Some((&3, &'c')));
    /// assert_eq!(map.pred(&3), Some((&1, &'a')));
    /// assert_eq!(map.pred(&1), None);
    /// ```
    pub fn pred<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::pred(&self.root, &self.cmp, key, false).map(Node::entry)
    }

    /// Like [`pred`](Self::pred), but an exact match is returned as is.
    pub fn pred_or_eq<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::pred(&self.root, &self.cmp, key, true).map(Node::entry)
    }

    /// [`pred`](Self::pred) with a mutable value reference.
    pub fn pred_mut<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::pred_mut(&mut self.root, &self.cmp, key, false)
    }

    /// [`pred_or_eq`](Self::pred_or_eq) with a mutable value reference.
    pub fn pred_or_eq_mut<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::pred_mut(&mut self.root, &self.cmp, key, true)
    }

    /// Returns the entry with the least key strictly above `key`.
    pub fn succ<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::succ(&self.root, &self.cmp, key, false).map(Node::entry)
    }

    /// Like [`succ`](Self::succ), but an exact match is returned as is.
    pub fn succ_or_eq<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::succ(&self.root, &self.cmp, key, true).map(Node::entry)
    }

    /// [`succ`](Self::succ) with a mutable value reference.
    pub fn succ_mut<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::succ_mut(&mut self.root, &self.cmp, key, false)
    }

    /// [`succ_or_eq`](Self::succ_or_eq) with a mutable value reference.
    pub fn succ_or_eq_mut<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        node::succ_mut(&mut self.root, &self.cmp, key, true)
    }

    /// Removes and returns the entry with the greatest key strictly below
    /// `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    ///
    /// assert_eq!(map.remove_pred(&1), None);
    /// assert_eq!(map.remove_pred(&2), Some((1, 'a')));
    /// assert_eq!(map.remove_pred_or_eq(&2), Some((2, 'b')));
    /// ```
    pub fn remove_pred<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let entry = node::remove_pred(&mut self.root, &self.cmp, key, false);
        if entry.is_some() {
            self.len -= 1;
        }
        entry
    }

    /// Like [`remove_pred`](Self::remove_pred), but an exact match is
    /// removed instead.
    pub fn remove_pred_or_eq<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let entry = node::remove_pred(&mut self.root, &self.cmp, key, true);
        if entry.is_some() {
            self.len -= 1;
        }
        entry
    }

    /// Removes and returns the entry with the least key strictly above
    /// `key`.
    pub fn remove_succ<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let entry = node::remove_succ(&mut self.root, &self.cmp, key, false);
        if entry.is_some() {
            self.len -= 1;
        }
        entry
    }

    /// Like [`remove_succ`](Self::remove_succ), but an exact match is
    /// removed instead.
    pub fn remove_succ_or_eq<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let entry = node::remove_succ(&mut self.root, &self.cmp, key, true);
        if entry.is_some() {
            self.len -= 1;
        }
        entry
    }

    /// Returns an `Entry` for in-place update of the value at `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.insert("a", 1);
    ///
    /// *map.entry("a").or_insert(0) += 10;
    /// *map.entry("b").or_insert(0) += 10;
    ///
    /// assert_eq!(map.get(&"a"), Some(&11));
    /// assert_eq!(map.get(&"b"), Some(&10));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        // TODO: find the slot once instead of twice
        if self.contains_key(&key) {
            let val = self.get_mut(&key).expect("contains_key was just true");
            Entry::Occupied(OccupiedEntry { key, val })
        } else {
            Entry::Vacant(VacantEntry { key, map: self })
        }
    }

    /// Returns a double-ended iterator over the entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(InOrder::new(self.root.as_deref().map(RefFrame::new), self.len))
    }

    /// Returns a double-ended iterator over the entries in key order, with
    /// mutable value references.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut(InOrder::new(
            self.root.as_deref_mut().map(MutFrame::new),
            self.len,
        ))
    }

    /// Returns a double-ended iterator over the entries whose keys lie
    /// within the given bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_collections::BstMap;
    /// use std::ops::Bound;
    ///
    /// let mut map = BstMap::new();
    /// map.extend([(5, 'e'), (3, 'c'), (8, 'h'), (1, 'a'), (4, 'd')]);
    ///
    /// let keys: Vec<i32> = map
    ///     .range(Bound::Included(&3), Bound::Excluded(&8))
    ///     .map(|(&k, _)| k)
    ///     .collect();
    /// assert_eq!(keys, [3, 4, 5]);
    /// ```
    pub fn range<Lo, Hi>(
        &self,
        lower: Bound<&Lo>,
        upper: Bound<&Hi>,
    ) -> Range<'_, K, V>
    where
        C: Compare<Lo, K> + Compare<Hi, K>,
        Lo: ?Sized,
        Hi: ?Sized,
    {
        Range(InOrderRange::new(
            self.root.as_deref().map(RefFrame::new),
            self.len,
            &self.cmp,
            lower,
            upper,
        ))
    }

    /// [`range`](Self::range) with mutable value references.
    pub fn range_mut<Lo, Hi>(
        &mut self,
        lower: Bound<&Lo>,
        upper: Bound<&Hi>,
    ) -> RangeMut<'_, K, V>
    where
        C: Compare<Lo, K> + Compare<Hi, K>,
        Lo: ?Sized,
        Hi: ?Sized,
    {
        RangeMut(InOrderRange::new(
            self.root.as_deref_mut().map(MutFrame::new),
            self.len,
            &self.cmp,
            lower,
            upper,
        ))
    }

    /// Consumes the map and returns a double-ended iterator over the owned
    /// entries whose keys lie within the given bounds.  Entries outside the
    /// bounds are dropped.
    pub fn into_range<Lo, Hi>(
        mut self,
        lower: Bound<&Lo>,
        upper: Bound<&Hi>,
    ) -> IntoRange<K, V>
    where
        C: Compare<Lo, K> + Compare<Hi, K>,
        Lo: ?Sized,
        Hi: ?Sized,
    {
        let root = self.root.take();
        let len = self.len;
        IntoRange(InOrderRange::new(root, len, &self.cmp, lower, upper))
    }

    /// Verifies the search-tree invariants: keys strictly increasing under
    /// the comparator, and `len` equal to the node count.
    ///
    /// Intended for tests; a map that fails this check has hit a bug in
    /// this crate.
    pub fn check(&self) -> Result<(), &'static str> {
        let mut stack = Vec::new();
        let mut cur = self.root.as_deref();
        let mut prev: Option<&K> = None;
        let mut count = 0;

        while cur.is_some() || !stack.is_empty() {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }

            let node = stack.pop().expect("loop guard ensures a pending node");
            if let Some(prev) = prev {
                if self.cmp.compare(prev, &node.key) != Ordering::Less {
                    return Err("keys are not strictly increasing");
                }
            }
            prev = Some(&node.key);
            count += 1;
            cur = node.right.as_deref();
        }

        if count == self.len {
            Ok(())
        } else {
            Err("len is out of sync with the tree")
        }
    }
}

impl<K, V, C> Drop for BstMap<K, V, C> {
    fn drop(&mut self) {
        node::drop_tree(self.root.take());
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for BstMap<K, V, C> {
    fn clone(&self) -> Self {
        BstMap {
            root: self.root.clone(),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<K, V, C> Default for BstMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn default() -> Self {
        BstMap::with_cmp(C::default())
    }
}

impl<K, V, C> Extend<(K, V)> for BstMap<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, it: I) {
        for (k, v) in it {
            self.insert(k, v);
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for BstMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(it: I) -> Self {
        let mut map = BstMap::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> fmt::Debug for BstMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Compare<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Hash for BstMap<K, V, C>
where
    K: Hash,
    V: Hash,
    C: Compare<K>,
{
    fn hash<H: Hasher>(&self, h: &mut H) {
        for entry in self.iter() {
            entry.hash(h);
        }
    }
}

impl<'a, K, V, C, Q> ops::Index<&'a Q> for BstMap<K, V, C>
where
    C: Compare<K> + Compare<Q, K>,
    Q: ?Sized,
{
    type Output = V;

    /// Returns the value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the map does not contain `key`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K, V, C> PartialEq for BstMap<K, V, C>
where
    V: PartialEq,
    C: Compare<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(l, r)| {
                self.cmp.compares_eq(l.0, r.0) && l.1 == r.1
            })
    }
}

impl<K, V, C> Eq for BstMap<K, V, C>
where
    V: Eq,
    C: Compare<K>,
{
}

impl<K, V, C> PartialOrd for BstMap<K, V, C>
where
    V: PartialOrd,
    C: Compare<K>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Some(Ordering::Equal),
                (None, Some(_)) => return Some(Ordering::Less),
                (Some(_), None) => return Some(Ordering::Greater),
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Ordering::Equal => match l.1.partial_cmp(r.1) {
                        Some(Ordering::Equal) => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return Some(non_eq),
                },
            }
        }
    }
}

impl<K, V, C> Ord for BstMap<K, V, C>
where
    V: Ord,
    C: Compare<K>,
{
    fn cmp(&self, other: &Self) -> Ordering {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Ordering::Equal => match l.1.cmp(r.1) {
                        Ordering::Equal => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return non_eq,
                },
            }
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a BstMap<K, V, C>
where
    C: Compare<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut BstMap<K, V, C>
where
    C: Compare<K>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for BstMap<K, V, C>
where
    C: Compare<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        let root = self.root.take();
        IntoIter(InOrder::new(root, self.len))
    }
}

/// A view into a single map entry, occupied or vacant.
pub enum Entry<'a, K, V, C = Natural<K>> {
    /// The key is present.
    Occupied(OccupiedEntry<'a, K, V>),
    /// The key is absent.
    Vacant(VacantEntry<'a, K, V, C>),
}

impl<'a, K, V, C> Entry<'a, K, V, C>
where
    K: Clone,
    C: Compare<K>,
{
    /// Inserts `default` if the entry is vacant; returns a mutable reference
    /// to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with(|| default)
    }

    /// Inserts the result of `default` if the entry is vacant; returns a
    /// mutable reference to the value.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Inserts `V::default()` if the entry is vacant; returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

/// A view into an occupied map entry.
pub struct OccupiedEntry<'a, K, V> {
    key: K,
    val: &'a mut V,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        self.val
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        self.val
    }

    /// Consumes the entry, returning a mutable reference tied to the map.
    pub fn into_mut(self) -> &'a mut V {
        self.val
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, val: V) -> V {
        std::mem::replace(self.val, val)
    }
}

/// A view into a vacant map entry.
pub struct VacantEntry<'a, K, V, C = Natural<K>> {
    key: K,
    map: &'a mut BstMap<K, V, C>,
}

impl<'a, K, V, C> VacantEntry<'a, K, V, C>
where
    K: Clone,
    C: Compare<K>,
{
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Consumes the entry, returning the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the key with `val` and returns a mutable reference to the
    /// value.
    pub fn insert(self, val: V) -> &'a mut V {
        self.map.insert(self.key.clone(), val);
        self.map.get_mut(&self.key).expect("entry was just inserted")
    }
}

/// A double-ended iterator over a map's entries.
pub struct Iter<'a, K, V>(InOrder<RefFrame<'a, K, V>>);

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A double-ended iterator over a map's entries with mutable value
/// references.
pub struct IterMut<'a, K, V>(InOrder<MutFrame<'a, K, V>>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// A double-ended iterator over a map's owned entries.
pub struct IntoIter<K, V>(InOrder<Box<Node<K, V>>>);

impl<K: Clone, V: Clone> Clone for IntoIter<K, V> {
    fn clone(&self) -> Self {
        IntoIter(self.0.clone())
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// A double-ended iterator over the entries in a key range.
pub struct Range<'a, K, V>(InOrderRange<RefFrame<'a, K, V>>);

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

/// A double-ended iterator over the entries in a key range with mutable
/// value references.
pub struct RangeMut<'a, K, V>(InOrderRange<MutFrame<'a, K, V>>);

impl<'a, K, V> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for RangeMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> FusedIterator for RangeMut<'_, K, V> {}

/// A double-ended iterator over the owned entries in a key range.
pub struct IntoRange<K, V>(InOrderRange<Box<Node<K, V>>>);

impl<K: Clone, V: Clone> Clone for IntoRange<K, V> {
    fn clone(&self) -> Self {
        IntoRange(self.0.clone())
    }
}

impl<K, V> Iterator for IntoRange<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoRange<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> FusedIterator for IntoRange<K, V> {}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::quickcheck;
    use std::collections::BTreeMap;
    use std::collections::VecDeque;

    fn ins_rm_test(vs: Vec<(i8, u32)>) {
        let mut map = BstMap::new();
        let mut std = BTreeMap::new();

        for &(k, v) in vs.iter() {
            match k {
                1..=i8::MAX => {
                    let k = k % 32;
                    assert_eq!(map.insert(k, v), std.insert(k, v));
                }

                0 | i8::MIN => (),

                _ => {
                    let k = -k % 32;
                    assert_eq!(map.remove(&k), std.remove_entry(&k));
                }
            }

            assert_eq!(map.len(), std.len());
            assert!(map.iter().eq(std.iter()));
            map.check().unwrap();
        }
    }

    fn pred_succ_test(vs: Vec<u8>, q: u8) {
        let map: BstMap<u8, u8> = vs.iter().map(|&k| (k, k)).collect();

        let below = map.iter().filter(|&(&k, _)| k < q).next_back();
        let above = map.iter().find(|&(&k, _)| k > q);

        assert_eq!(map.pred(&q), below);
        assert_eq!(map.succ(&q), above);

        // the _or_eq forms collapse to the exact entry when present
        if map.contains_key(&q) {
            assert_eq!(map.pred_or_eq(&q).map(|(&k, _)| k), Some(q));
            assert_eq!(map.succ_or_eq(&q).map(|(&k, _)| k), Some(q));
        } else {
            assert_eq!(map.pred_or_eq(&q), below);
            assert_eq!(map.succ_or_eq(&q), above);
        }
    }

    fn mut_accessors_test(vs: Vec<(u8, u32)>, q: u8) {
        let mut map: BstMap<u8, u32> = vs.into_iter().collect();
        let mut std: BTreeMap<u8, u32> = map.iter().map(|(&k, &v)| (k, v)).collect();

        // wrapping: generated values include u32::MAX
        fn bump(v: &mut u32) {
            *v = v.wrapping_add(1);
        }

        if let Some((&k, v)) = map.pred_mut(&q) {
            bump(v);
            bump(std.get_mut(&k).unwrap());
            assert!(k < q);
        }
        if let Some((&k, v)) = map.succ_or_eq_mut(&q) {
            bump(v);
            bump(std.get_mut(&k).unwrap());
            assert!(k >= q);
        }
        if let Some((&k, v)) = map.first_key_value_mut() {
            bump(v);
            bump(std.get_mut(&k).unwrap());
        }
        if let Some((&k, v)) = map.last_key_value_mut() {
            bump(v);
            bump(std.get_mut(&k).unwrap());
        }

        assert!(map.iter().eq(std.iter()));
        map.check().unwrap();
    }

    fn remove_pred_succ_test(vs: Vec<u8>, q: u8) {
        let mut map: BstMap<u8, u8> = vs.iter().map(|&k| (k, k)).collect();
        let mut std: BTreeMap<u8, u8> = map.iter().map(|(&k, &v)| (k, v)).collect();

        let below = std.range(..q).next_back().map(|(&k, _)| k);
        assert_eq!(map.remove_pred(&q), below.and_then(|k| std.remove_entry(&k)));
        map.check().unwrap();

        let above = std
            .range((Bound::Excluded(q), Bound::Unbounded))
            .next()
            .map(|(&k, _)| k);
        assert_eq!(map.remove_succ(&q), above.and_then(|k| std.remove_entry(&k)));
        map.check().unwrap();

        // the inclusive forms take the exact key first
        let below = std.range(..=q).next_back().map(|(&k, _)| k);
        assert_eq!(
            map.remove_pred_or_eq(&q),
            below.and_then(|k| std.remove_entry(&k))
        );

        let above = std.range(q..).next().map(|(&k, _)| k);
        assert_eq!(
            map.remove_succ_or_eq(&q),
            above.and_then(|k| std.remove_entry(&k))
        );

        assert_eq!(map.len(), std.len());
        assert!(map.iter().eq(std.iter()));
        map.check().unwrap();
    }

    fn to_bound(b: &Option<(u8, bool)>) -> Bound<&u8> {
        match b {
            None => Bound::Unbounded,
            Some((k, true)) => Bound::Included(k),
            Some((k, false)) => Bound::Excluded(k),
        }
    }

    fn in_range(k: u8, lo: &Option<(u8, bool)>, hi: &Option<(u8, bool)>) -> bool {
        let lo_ok = match *lo {
            None => true,
            Some((b, true)) => k >= b,
            Some((b, false)) => k > b,
        };
        let hi_ok = match *hi {
            None => true,
            Some((b, true)) => k <= b,
            Some((b, false)) => k < b,
        };
        lo_ok && hi_ok
    }

    fn range_test(vs: Vec<(u8, u8)>, lo: Option<(u8, bool)>, hi: Option<(u8, bool)>) {
        let map: BstMap<u8, u8> = vs.into_iter().collect();

        let expected: Vec<(u8, u8)> = map
            .iter()
            .filter(|&(&k, _)| in_range(k, &lo, &hi))
            .map(|(&k, &v)| (k, v))
            .collect();

        let fwd: Vec<(u8, u8)> = map
            .range(to_bound(&lo), to_bound(&hi))
            .map(|(&k, &v)| (k, v))
            .collect();
        assert_eq!(fwd, expected);

        let mut bwd: Vec<(u8, u8)> = map
            .range(to_bound(&lo), to_bound(&hi))
            .rev()
            .map(|(&k, &v)| (k, v))
            .collect();
        bwd.reverse();
        assert_eq!(bwd, expected);

        let owned: Vec<(u8, u8)> = map
            .clone()
            .into_range(to_bound(&lo), to_bound(&hi))
            .collect();
        assert_eq!(owned, expected);
    }

    fn interleave_test(vs: Vec<(u8, u8)>, dirs: Vec<bool>) {
        let map: BstMap<u8, u8> = vs.into_iter().collect();
        let mut expected: VecDeque<(u8, u8)> =
            map.iter().map(|(&k, &v)| (k, v)).collect();

        let mut it = map.iter();
        for &fwd in dirs.iter() {
            assert_eq!(it.len(), expected.len());
            let (got, want) = if fwd {
                (it.next(), expected.pop_front())
            } else {
                (it.next_back(), expected.pop_back())
            };
            assert_eq!(got.map(|(&k, &v)| (k, v)), want);
        }

        // drain whatever the walk above left behind
        assert!(it.map(|(&k, &v)| (k, v)).eq(expected.into_iter()));
    }

    fn remove_extremes_test(vs: Vec<(u8, u8)>) {
        let mut map: BstMap<u8, u8> = vs.into_iter().collect();
        let mut std: BTreeMap<u8, u8> = map.iter().map(|(&k, &v)| (k, v)).collect();

        while !map.is_empty() {
            assert_eq!(map.pop_first(), std.pop_first());
            map.check().unwrap();
            assert_eq!(map.pop_last(), std.pop_last());
            map.check().unwrap();
        }
        assert!(std.is_empty());
    }

    #[test]
    fn documented_scenario() {
        let mut map = BstMap::new();
        map.extend([5, 3, 8, 1, 4, 7, 9].map(|k| (k, k * 10)));

        assert_eq!(map.len(), 7);
        assert_eq!(map.first_key_value(), Some((&1, &10)));
        assert_eq!(map.last_key_value(), Some((&9, &90)));
        assert_eq!(map.pred(&6), Some((&5, &50)));
        assert_eq!(map.succ(&6), Some((&7, &70)));

        let keys: Vec<i32> = map
            .range(Bound::Included(&3), Bound::Included(&7))
            .map(|(&k, _)| k)
            .collect();
        assert_eq!(keys, [3, 4, 5, 7]);

        assert_eq!(map.remove(&5), Some((5, 50)));
        assert_eq!(map.len(), 6);
        assert_eq!(map.pred(&6), Some((&4, &40)));
        map.check().unwrap();
    }

    #[test]
    fn insert_replaces_key_and_value() {
        let mut map = BstMap::new();
        assert_eq!(map.insert(1, 'a'), None);
        assert_eq!(map.insert(1, 'b'), Some('a'));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&'b'));
    }

    #[test]
    fn clear_resets() {
        let mut map: BstMap<u8, u8> = (0..100).map(|k| (k, k)).collect();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().next(), None);
        map.check().unwrap();

        map.insert(3, 3);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn reversed_comparator() {
        let mut map = BstMap::with_cmp(natural().rev());
        map.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
        map.check().unwrap();

        let keys: Vec<i32> = map.iter().map(|(&k, _)| k).collect();
        assert_eq!(keys, [3, 2, 1]);

        // "predecessor" follows the map's order, not the natural one
        assert_eq!(map.pred(&2), Some((&3, &'c')));
        assert_eq!(map.succ(&2), Some((&1, &'a')));
        assert_eq!(map.first_key_value(), Some((&3, &'c')));
        assert_eq!(map.last_key_value(), Some((&1, &'a')));
    }

    #[test]
    fn index_returns_value() {
        let mut map = BstMap::new();
        map.insert(1, "a");
        assert_eq!(map[&1], "a");
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_panics_on_missing_key() {
        let map: BstMap<i32, i32> = BstMap::new();
        let _ = map[&1];
    }

    #[test]
    fn iter_mut_updates_values_in_place() {
        let mut map: BstMap<u8, u32> = (0..10).map(|k| (k, 0)).collect();

        for (k, v) in &mut map {
            *v = *k as u32 + 100;
        }

        assert!(map.iter().all(|(&k, &v)| v == k as u32 + 100));
        map.check().unwrap();
    }

    #[test]
    fn range_mut_only_touches_the_range() {
        let mut map: BstMap<u8, u32> = (0..10).map(|k| (k, 0)).collect();

        for (_, v) in map.range_mut(Bound::Included(&3), Bound::Excluded(&7)) {
            *v = 1;
        }

        for (&k, &v) in map.iter() {
            assert_eq!(v, u32::from((3..7).contains(&k)));
        }
    }

    #[test]
    fn eq_and_ord_are_sequence_based() {
        let a: BstMap<u8, u8> = [(1, 1), (2, 2)].into_iter().collect();
        let b: BstMap<u8, u8> = [(2, 2), (1, 1)].into_iter().collect();
        let c: BstMap<u8, u8> = [(1, 1), (3, 3)].into_iter().collect();

        // same entries, different shapes
        assert_eq!(a, b);
        assert!(a < c);
        assert!(c > b);

        let shorter: BstMap<u8, u8> = [(1, 1)].into_iter().collect();
        assert!(shorter < a);

        // Ord::min compares whole maps; the least entry goes by
        // first_key_value
        assert_eq!(a.clone().min(c.clone()), a);
        assert_eq!(a.clone().max(c.clone()), c);
        assert_eq!(a.first_key_value(), Some((&1, &1)));
        assert_eq!(c.last_key_value(), Some((&3, &3)));
    }

    #[test]
    fn hash_agrees_with_eq() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(map: &BstMap<u8, u8>) -> u64 {
            let mut h = DefaultHasher::new();
            map.hash(&mut h);
            h.finish()
        }

        let a: BstMap<u8, u8> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        let b: BstMap<u8, u8> = [(3, 3), (1, 1), (2, 2)].into_iter().collect();
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn debug_renders_in_order() {
        let map: BstMap<u8, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
        assert_eq!(format!("{:?}", map), "{1: 'a', 2: 'b'}");
    }

    #[test]
    fn clone_is_independent() {
        let mut a: BstMap<u8, u8> = (0..10).map(|k| (k, k)).collect();
        let b = a.clone();

        a.remove(&5);
        *a.get_mut(&6).unwrap() = 99;

        assert_eq!(b.len(), 10);
        assert_eq!(b.get(&5), Some(&5));
        assert_eq!(b.get(&6), Some(&6));
        b.check().unwrap();
    }

    #[test]
    fn entry_api() {
        let mut map: BstMap<&str, u32> = BstMap::new();

        assert_eq!(*map.entry("a").or_insert(1), 1);
        assert_eq!(*map.entry("a").or_insert(7), 1);

        map.entry("a").and_modify(|v| *v += 1).or_insert(0);
        assert_eq!(map.get(&"a"), Some(&2));

        map.entry("b").and_modify(|v| *v += 1).or_insert(10);
        assert_eq!(map.get(&"b"), Some(&10));

        assert_eq!(*map.entry("c").or_default(), 0);
        assert_eq!(map.entry("c").key(), &"c");
        map.check().unwrap();
    }

    #[test]
    fn into_iter_yields_owned_entries_in_order() {
        let map: BstMap<u8, String> =
            [(2, "b".to_string()), (1, "a".to_string())].into_iter().collect();

        let entries: Vec<(u8, String)> = map.into_iter().collect();
        assert_eq!(entries, [(1, "a".to_string()), (2, "b".to_string())]);
    }

    #[test]
    fn partial_consumption_drops_the_rest() {
        // exercises the iterator's teardown of unvisited subtrees
        let map: BstMap<u16, String> =
            (0..100).map(|k| (k, k.to_string())).collect();

        let mut it = map.into_iter();
        assert_eq!(it.next().map(|(k, _)| k), Some(0));
        assert_eq!(it.next_back().map(|(k, _)| k), Some(99));
        drop(it);
    }

    #[test]
    fn size_hints() {
        let map: BstMap<u8, u8> = (0..10).map(|k| (k, k)).collect();

        let mut it = map.iter();
        assert_eq!(it.size_hint(), (10, Some(10)));
        it.next();
        it.next_back();
        assert_eq!(it.len(), 8);

        let range = map.range(Bound::Included(&2), Bound::Excluded(&7));
        let (lo, hi) = range.size_hint();
        assert!(lo <= 5);
        assert!(hi.unwrap() >= 5);
    }

    #[test]
    fn range_with_crossed_bounds_is_empty() {
        let map: BstMap<u8, u8> = (0..10).map(|k| (k, k)).collect();
        let mut range = map.range(Bound::Included(&7), Bound::Included(&3));
        assert_eq!(range.next(), None);
        assert_eq!(range.next_back(), None);
    }

    #[test]
    fn ins_rm_regr1() {
        ins_rm_test(vec![(9, 0), (-9, 1)]);
    }

    #[test]
    fn range_regr1() {
        range_test(vec![(3, 0), (1, 0), (2, 0)], Some((2, false)), None);
    }

    #[test]
    fn interleave_regr1() {
        interleave_test(vec![(1, 0), (2, 0), (3, 0)], vec![false, true, false]);
    }

    #[test]
    fn mut_accessors_regr1() {
        mut_accessors_test(vec![(1, u32::MAX)], 2);
    }

    #[test]
    fn remove_pred_succ_regr1() {
        remove_pred_succ_test(vec![5, 3, 8], 5);
        remove_pred_succ_test(vec![1], 0);
    }

    quickcheck! {
        fn qc_ins_rm(vs: Vec<(i8, u32)>) -> () {
            ins_rm_test(vs);
        }

        fn qc_pred_succ(vs: Vec<u8>, q: u8) -> () {
            pred_succ_test(vs, q);
        }

        fn qc_mut_accessors(vs: Vec<(u8, u32)>, q: u8) -> () {
            mut_accessors_test(vs, q);
        }

        fn qc_range(vs: Vec<(u8, u8)>, lo: Option<(u8, bool)>, hi: Option<(u8, bool)>) -> () {
            range_test(vs, lo, hi);
        }

        fn qc_interleave(vs: Vec<(u8, u8)>, dirs: Vec<bool>) -> () {
            interleave_test(vs, dirs);
        }

        fn qc_remove_extremes(vs: Vec<(u8, u8)>) -> () {
            remove_extremes_test(vs);
        }

        fn qc_remove_pred_succ(vs: Vec<u8>, q: u8) -> () {
            remove_pred_succ_test(vs, q);
        }
    }
}
