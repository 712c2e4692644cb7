//! The tree core shared by `BstMap` and `BstSet`.
//!
//! Everything here operates on a `Link`, an optional owned subtree.  The
//! functions are free-standing so the map can borrow its comparator and its
//! root independently.  Traversals are iterative; an unbalanced tree can be
//! as deep as it has nodes, and we must not blow the stack on adversarial
//! insertion orders.

use compare::Compare;
use std::cmp::Ordering::*;
use std::mem;
use std::ptr::NonNull;

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub key: K,
    pub val: V,
    pub left: Link<K, V>,
    pub right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, val: V) -> Self {
        Node {
            key,
            val,
            left: None,
            right: None,
        }
    }

    pub fn entry(&self) -> (&K, &V) {
        (&self.key, &self.val)
    }
}

/// Inserts `(key, val)` into the tree at `link`.  An equal key has its key
/// and value replaced; the old value is returned.
pub(crate) fn insert<K, V, C>(
    link: &mut Link<K, V>,
    cmp: &C,
    key: K,
    val: V,
) -> Option<V>
where
    C: Compare<K>,
{
    let mut cur = link;
    while let Some(node) = cur {
        match cmp.compare(&key, &node.key) {
            Less => cur = &mut node.left,
            Greater => cur = &mut node.right,
            Equal => {
                node.key = key;
                return Some(mem::replace(&mut node.val, val));
            }
        }
    }

    *cur = Some(Box::new(Node::new(key, val)));
    None
}

pub(crate) fn get<'a, K, V, C, Q>(
    link: &'a Link<K, V>,
    cmp: &C,
    key: &Q,
) -> Option<&'a Node<K, V>>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    let mut cur = link;
    while let Some(node) = cur {
        match cmp.compare(key, &node.key) {
            Less => cur = &node.left,
            Greater => cur = &node.right,
            Equal => return Some(node),
        }
    }

    None
}

pub(crate) fn get_mut<'a, K, V, C, Q>(
    link: &'a mut Link<K, V>,
    cmp: &C,
    key: &Q,
) -> Option<&'a mut V>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    let mut cur = link;
    while let Some(node) = cur {
        match cmp.compare(key, &node.key) {
            Less => cur = &mut node.left,
            Greater => cur = &mut node.right,
            Equal => return Some(&mut node.val),
        }
    }

    None
}

/// Removes the entry for `key`, if present.
///
/// The two-child case splices the in-order successor node (the minimum of
/// the right subtree) into the removed node's place, reusing its allocation.
pub(crate) fn remove<K, V, C, Q>(
    link: &mut Link<K, V>,
    cmp: &C,
    key: &Q,
) -> Option<(K, V)>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    // The cursor tracks the link that owns the current node.  Raw pointers
    // because the final unlink mutates a link while the loop still formally
    // holds a borrow derived from it.
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        loop {
            match &mut *cur {
                None => return None,
                Some(node) => match cmp.compare(key, &node.key) {
                    Less => cur = &mut node.left,
                    Greater => cur = &mut node.right,
                    Equal => break,
                },
            }
        }

        Some(detach(&mut *cur))
    }
}

// Unlinks the node at `link`, which must be occupied, and returns its entry.
fn detach<K, V>(link: &mut Link<K, V>) -> (K, V) {
    let mut node = link.take().expect("detach requires an occupied link");

    match (node.left.take(), node.right.take()) {
        (None, None) => {}
        (Some(child), None) | (None, Some(child)) => *link = Some(child),
        (Some(left), Some(right)) => {
            let mut rest = Some(right);
            let mut succ =
                detach_min(&mut rest).expect("right subtree is nonempty");
            succ.left = Some(left);
            succ.right = rest;
            *link = Some(succ);
        }
    }

    (node.key, node.val)
}

/// Unlinks the minimum node of the tree at `link` and returns it with both
/// children detached.
pub(crate) fn detach_min<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            if node.left.is_none() {
                break;
            }
            cur = &mut node.left;
        }

        let mut node = (*cur).take()?;
        *cur = node.right.take();
        Some(node)
    }
}

/// Mirror of [`detach_min`].
pub(crate) fn detach_max<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            if node.right.is_none() {
                break;
            }
            cur = &mut node.right;
        }

        let mut node = (*cur).take()?;
        *cur = node.left.take();
        Some(node)
    }
}

pub(crate) fn min<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut cur = link.as_deref()?;
    while let Some(left) = cur.left.as_deref() {
        cur = left;
    }
    Some(cur)
}

pub(crate) fn max<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut cur = link.as_deref()?;
    while let Some(right) = cur.right.as_deref() {
        cur = right;
    }
    Some(cur)
}

pub(crate) fn min_mut<K, V>(link: &mut Link<K, V>) -> Option<(&K, &mut V)> {
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            if node.left.is_none() {
                return Some((&node.key, &mut node.val));
            }
            cur = &mut node.left;
        }
        None
    }
}

pub(crate) fn max_mut<K, V>(link: &mut Link<K, V>) -> Option<(&K, &mut V)> {
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            if node.right.is_none() {
                return Some((&node.key, &mut node.val));
            }
            cur = &mut node.right;
        }
        None
    }
}

/// Finds the entry with the greatest key below `key`.  `inclusive` accepts
/// an exact match as the answer.
pub(crate) fn pred<'a, K, V, C, Q>(
    link: &'a Link<K, V>,
    cmp: &C,
    key: &Q,
    inclusive: bool,
) -> Option<&'a Node<K, V>>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    let mut best = None;
    let mut cur = link;
    while let Some(node) = cur {
        match cmp.compare(key, &node.key) {
            Greater => {
                best = Some(&**node);
                cur = &node.right;
            }
            Equal if inclusive => return Some(node),
            _ => cur = &node.left,
        }
    }

    best
}

/// Mirror of [`pred`]: the least key above `key`.
pub(crate) fn succ<'a, K, V, C, Q>(
    link: &'a Link<K, V>,
    cmp: &C,
    key: &Q,
    inclusive: bool,
) -> Option<&'a Node<K, V>>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    let mut best = None;
    let mut cur = link;
    while let Some(node) = cur {
        match cmp.compare(key, &node.key) {
            Less => {
                best = Some(&**node);
                cur = &node.left;
            }
            Equal if inclusive => return Some(node),
            _ => cur = &node.right,
        }
    }

    best
}

pub(crate) fn pred_mut<'a, K, V, C, Q>(
    link: &'a mut Link<K, V>,
    cmp: &C,
    key: &Q,
    inclusive: bool,
) -> Option<(&'a K, &'a mut V)>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    let mut best: Option<NonNull<Node<K, V>>> = None;
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            match cmp.compare(key, &node.key) {
                Greater => {
                    best = Some(NonNull::from(&mut **node));
                    cur = &mut node.right;
                }
                Equal if inclusive => {
                    best = Some(NonNull::from(&mut **node));
                    break;
                }
                _ => cur = &mut node.left,
            }
        }

        match best {
            Some(ptr) => {
                let node = &mut *ptr.as_ptr();
                Some((&node.key, &mut node.val))
            }
            None => None,
        }
    }
}

pub(crate) fn succ_mut<'a, K, V, C, Q>(
    link: &'a mut Link<K, V>,
    cmp: &C,
    key: &Q,
    inclusive: bool,
) -> Option<(&'a K, &'a mut V)>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    let mut best: Option<NonNull<Node<K, V>>> = None;
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            match cmp.compare(key, &node.key) {
                Less => {
                    best = Some(NonNull::from(&mut **node));
                    cur = &mut node.left;
                }
                Equal if inclusive => {
                    best = Some(NonNull::from(&mut **node));
                    break;
                }
                _ => cur = &mut node.right,
            }
        }

        match best {
            Some(ptr) => {
                let node = &mut *ptr.as_ptr();
                Some((&node.key, &mut node.val))
            }
            None => None,
        }
    }
}

/// Removes the entry with the greatest key below `key`.  `inclusive`
/// accepts an exact match as the victim.
pub(crate) fn remove_pred<K, V, C, Q>(
    link: &mut Link<K, V>,
    cmp: &C,
    key: &Q,
    inclusive: bool,
) -> Option<(K, V)>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    // Tracks the link holding the best candidate, not the node: the final
    // unlink happens through it.  Boxed nodes never move, so the pointer
    // stays valid across the rest of the descent.
    let mut best: Option<*mut Link<K, V>> = None;
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            match cmp.compare(key, &node.key) {
                Greater => {
                    best = Some(cur);
                    cur = &mut node.right;
                }
                Equal if inclusive => {
                    best = Some(cur);
                    break;
                }
                _ => cur = &mut node.left,
            }
        }

        best.map(|link| detach(&mut *link))
    }
}

/// Mirror of [`remove_pred`]: removes the entry with the least key above
/// `key`.
pub(crate) fn remove_succ<K, V, C, Q>(
    link: &mut Link<K, V>,
    cmp: &C,
    key: &Q,
    inclusive: bool,
) -> Option<(K, V)>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    let mut best: Option<*mut Link<K, V>> = None;
    let mut cur: *mut Link<K, V> = link;
    unsafe {
        while let Some(node) = &mut *cur {
            match cmp.compare(key, &node.key) {
                Less => {
                    best = Some(cur);
                    cur = &mut node.left;
                }
                Equal if inclusive => {
                    best = Some(cur);
                    break;
                }
                _ => cur = &mut node.right,
            }
        }

        best.map(|link| detach(&mut *link))
    }
}

/// Tears down a tree without recursing.  `Box<Node>`'s implicit drop walks
/// the children recursively, which overflows the stack on long chains.
pub(crate) fn drop_tree<K, V>(root: Link<K, V>) {
    let mut stack: Vec<Box<Node<K, V>>> = Vec::new();
    stack.extend(root);
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}
