//! One traversal engine for all six iterator shapes.
//!
//! An in-order walk is a deque of "frames", each a handle on a node plus
//! marks recording which children have already been expanded.  The forward
//! cursor works at the back of the deque (descending left), the backward
//! cursor at the front (descending right).  Both cursors share the deque, so
//! they exhaust the same set of nodes exactly once and meet in the middle
//! when it empties.
//!
//! The frame decides the ownership mode: a shared reference, a mutable
//! reference behind a raw pointer, or the owned boxed node itself.

use compare::Compare;
use std::cmp::Ordering::*;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::ops::Bound;

use crate::node::{drop_tree, Node};

pub(crate) trait Frame: Sized {
    type Key;
    type Item;

    fn key(&self) -> &Self::Key;
    fn into_item(self) -> Self::Item;

    /// The left child's frame, or `None` if absent or already expanded.
    fn left(&mut self) -> Option<Self>;
    fn right(&mut self) -> Option<Self>;

    /// Releases a frame, and any subtree it owns, without yielding it.
    fn discard(self) {}
}

pub(crate) struct RefFrame<'a, K, V> {
    node: &'a Node<K, V>,
    seen_left: bool,
    seen_right: bool,
}

impl<'a, K, V> RefFrame<'a, K, V> {
    pub(crate) fn new(node: &'a Node<K, V>) -> Self {
        RefFrame {
            node,
            seen_left: false,
            seen_right: false,
        }
    }
}

impl<K, V> Clone for RefFrame<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for RefFrame<'_, K, V> {}

impl<'a, K, V> Frame for RefFrame<'a, K, V> {
    type Key = K;
    type Item = (&'a K, &'a V);

    fn key(&self) -> &K {
        &self.node.key
    }

    fn into_item(self) -> (&'a K, &'a V) {
        (&self.node.key, &self.node.val)
    }

    fn left(&mut self) -> Option<Self> {
        if self.seen_left {
            return None;
        }
        self.seen_left = true;
        self.node.left.as_deref().map(RefFrame::new)
    }

    fn right(&mut self) -> Option<Self> {
        if self.seen_right {
            return None;
        }
        self.seen_right = true;
        self.node.right.as_deref().map(RefFrame::new)
    }
}

pub(crate) struct MutFrame<'a, K, V> {
    node: *mut Node<K, V>,
    seen_left: bool,
    seen_right: bool,
    _marker: PhantomData<&'a mut Node<K, V>>,
}

impl<'a, K, V> MutFrame<'a, K, V> {
    pub(crate) fn new(node: &'a mut Node<K, V>) -> Self {
        MutFrame {
            node,
            seen_left: false,
            seen_right: false,
            _marker: PhantomData,
        }
    }
}

// The raw pointer stands in for the &'a mut it was created from.
unsafe impl<K: Send, V: Send> Send for MutFrame<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for MutFrame<'_, K, V> {}

impl<'a, K, V> Frame for MutFrame<'a, K, V> {
    type Key = K;
    type Item = (&'a K, &'a mut V);

    fn key(&self) -> &K {
        unsafe { &(*self.node).key }
    }

    fn into_item(self) -> (&'a K, &'a mut V) {
        // Each node is reachable through exactly one frame, so handing out
        // the borrow once per frame cannot alias.
        let node = unsafe { &mut *self.node };
        (&node.key, &mut node.val)
    }

    fn left(&mut self) -> Option<Self> {
        if self.seen_left {
            return None;
        }
        self.seen_left = true;
        unsafe { (*self.node).left.as_deref_mut().map(MutFrame::new) }
    }

    fn right(&mut self) -> Option<Self> {
        if self.seen_right {
            return None;
        }
        self.seen_right = true;
        unsafe { (*self.node).right.as_deref_mut().map(MutFrame::new) }
    }
}

impl<K, V> Frame for Box<Node<K, V>> {
    type Key = K;
    type Item = (K, V);

    fn key(&self) -> &K {
        &self.key
    }

    fn into_item(self) -> (K, V) {
        let node = *self;
        (node.key, node.val)
    }

    // Taking the child doubles as the "seen" mark.
    fn left(&mut self) -> Option<Self> {
        self.left.take()
    }

    fn right(&mut self) -> Option<Self> {
        self.right.take()
    }

    fn discard(mut self) {
        drop_tree(self.left.take());
        drop_tree(self.right.take());
    }
}

pub(crate) struct InOrder<F: Frame> {
    frames: VecDeque<F>,
    remaining: usize,
}

impl<F: Frame> InOrder<F> {
    pub(crate) fn new(root: Option<F>, len: usize) -> Self {
        InOrder {
            frames: root.into_iter().collect(),
            remaining: len,
        }
    }
}

impl<F: Frame + Clone> Clone for InOrder<F> {
    fn clone(&self) -> Self {
        InOrder {
            frames: self.frames.clone(),
            remaining: self.remaining,
        }
    }
}

impl<F: Frame> Drop for InOrder<F> {
    fn drop(&mut self) {
        for frame in self.frames.drain(..) {
            frame.discard();
        }
    }
}

impl<F: Frame> Iterator for InOrder<F> {
    type Item = F::Item;

    fn next(&mut self) -> Option<F::Item> {
        loop {
            match self.frames.back_mut().and_then(F::left) {
                Some(left) => self.frames.push_back(left),
                None => {
                    return self.frames.pop_back().map(|mut frame| {
                        self.remaining -= 1;
                        if let Some(right) = frame.right() {
                            self.frames.push_back(right);
                        }
                        frame.into_item()
                    })
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<F: Frame> DoubleEndedIterator for InOrder<F> {
    fn next_back(&mut self) -> Option<F::Item> {
        loop {
            match self.frames.front_mut().and_then(F::right) {
                Some(right) => self.frames.push_front(right),
                None => {
                    return self.frames.pop_front().map(|mut frame| {
                        self.remaining -= 1;
                        if let Some(left) = frame.left() {
                            self.frames.push_front(left);
                        }
                        frame.into_item()
                    })
                }
            }
        }
    }
}

impl<F: Frame> ExactSizeIterator for InOrder<F> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// An [`InOrder`] trimmed to a key range.
///
/// `remaining` is left at the whole tree's size, so the wrapper reports the
/// looser hint `(frames.len(), Some(remaining))`: every queued frame will be
/// yielded, and no more than `remaining` items can be.
pub(crate) struct InOrderRange<F: Frame>(InOrder<F>);

impl<F: Frame> InOrderRange<F> {
    pub(crate) fn new<C, Lo, Hi>(
        root: Option<F>,
        len: usize,
        cmp: &C,
        lower: Bound<&Lo>,
        upper: Bound<&Hi>,
    ) -> Self
    where
        C: Compare<Lo, F::Key> + Compare<Hi, F::Key>,
        Lo: ?Sized,
        Hi: ?Sized,
    {
        let mut it = InOrder::new(root, len);
        cut_below(&mut it, cmp, lower);
        cut_above(&mut it, cmp, upper);
        InOrderRange(it)
    }
}

impl<F: Frame + Clone> Clone for InOrderRange<F> {
    fn clone(&self) -> Self {
        InOrderRange(self.0.clone())
    }
}

impl<F: Frame> Iterator for InOrderRange<F> {
    type Item = F::Item;

    fn next(&mut self) -> Option<F::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.frames.len(), Some(self.0.remaining))
    }
}

impl<F: Frame> DoubleEndedIterator for InOrderRange<F> {
    fn next_back(&mut self) -> Option<F::Item> {
        self.0.next_back()
    }
}

/// Drops every queued entry whose key falls below `bound`.
///
/// Works at the forward (back) end of the deque: descend toward the bound,
/// pruning subtrees that lie entirely outside it.  Ancestors left on the
/// deque were already vetted by an earlier iteration, so each loop step
/// either descends or finishes.
fn cut_below<F, C, Q>(it: &mut InOrder<F>, cmp: &C, bound: Bound<&Q>)
where
    F: Frame,
    C: Compare<Q, F::Key>,
    Q: ?Sized,
{
    let (key, inclusive) = match bound {
        Bound::Unbounded => return,
        Bound::Included(key) => (key, true),
        Bound::Excluded(key) => (key, false),
    };

    loop {
        let frame = match it.frames.back_mut() {
            None => return,
            Some(frame) => frame,
        };

        match cmp.compare(key, frame.key()) {
            // bound below this node: the cut continues in its left subtree
            Less => match frame.left() {
                Some(left) => it.frames.push_back(left),
                None => return,
            },
            // exact inclusive match: only the left subtree is out of range
            Equal if inclusive => {
                if let Some(left) = frame.left() {
                    left.discard();
                }
                return;
            }
            // this node and its left subtree are out of range
            ord => {
                let mut frame = match it.frames.pop_back() {
                    None => return,
                    Some(frame) => frame,
                };
                if let Some(left) = frame.left() {
                    left.discard();
                }
                if let Some(right) = frame.right() {
                    it.frames.push_back(right);
                }
                frame.discard();
                if ord == Equal {
                    return;
                }
            }
        }
    }
}

/// Mirror of [`cut_below`] at the backward (front) end of the deque.
fn cut_above<F, C, Q>(it: &mut InOrder<F>, cmp: &C, bound: Bound<&Q>)
where
    F: Frame,
    C: Compare<Q, F::Key>,
    Q: ?Sized,
{
    let (key, inclusive) = match bound {
        Bound::Unbounded => return,
        Bound::Included(key) => (key, true),
        Bound::Excluded(key) => (key, false),
    };

    loop {
        let frame = match it.frames.front_mut() {
            None => return,
            Some(frame) => frame,
        };

        match cmp.compare(key, frame.key()) {
            Greater => match frame.right() {
                Some(right) => it.frames.push_front(right),
                None => return,
            },
            Equal if inclusive => {
                if let Some(right) = frame.right() {
                    right.discard();
                }
                return;
            }
            ord => {
                let mut frame = match it.frames.pop_front() {
                    None => return,
                    Some(frame) => frame,
                };
                if let Some(right) = frame.right() {
                    right.discard();
                }
                if let Some(left) = frame.left() {
                    it.frames.push_front(left);
                }
                frame.discard();
                if ord == Equal {
                    return;
                }
            }
        }
    }
}
