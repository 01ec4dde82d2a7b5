use std::{collections::VecDeque, ops::Bound};

use crate::node::{NodeId, NodeRef};
use crate::rbt::Rbt;
use crate::rotate::Links;

/// Iterator over keys in sort order, follows successor links so every
/// step is O(1) amortized and nothing is buffered.
pub struct Iter<'a, K>
where
    K: Clone + Ord,
{
    tree: &'a Rbt<K>,
    next: Option<NodeId>,
}

impl<'a, K> Iter<'a, K>
where
    K: Clone + Ord,
{
    pub(crate) fn new(tree: &'a Rbt<K>, next: Option<NodeId>) -> Iter<'a, K> {
        Iter { tree, next }
    }
}

impl<'a, K> Iterator for Iter<'a, K>
where
    K: Clone + Ord,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.next_id(id);
        Some(self.tree.key(id))
    }
}

pub struct Range<'a, K>
where
    K: Clone + Ord,
{
    tree: &'a Rbt<K>,
    next: Option<NodeId>,
    low: Bound<K>,
    high: Bound<K>,
}

impl<'a, K> Range<'a, K>
where
    K: Clone + Ord,
{
    pub(crate) fn new(tree: &'a Rbt<K>, low: Bound<K>, high: Bound<K>) -> Range<'a, K> {
        let next = tree.lower_bound(low.as_ref());
        Range {
            tree,
            next,
            low,
            high,
        }
    }

    /// Same window of keys, from high to low.
    pub fn rev(self) -> Reverse<'a, K> {
        let next = self.tree.upper_bound(self.high.as_ref());
        Reverse {
            tree: self.tree,
            next,
            low: self.low,
        }
    }
}

impl<'a, K> Iterator for Range<'a, K>
where
    K: Clone + Ord,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let key = self.tree.key(id);
        // check for upper bound
        let ok = match &self.high {
            Bound::Unbounded => true,
            Bound::Included(qigh) => key <= qigh,
            Bound::Excluded(qigh) => key < qigh,
        };
        if ok {
            self.next = self.tree.next_id(id);
            Some(key)
        } else {
            self.next = None;
            None
        }
    }
}

pub struct Reverse<'a, K>
where
    K: Clone + Ord,
{
    tree: &'a Rbt<K>,
    next: Option<NodeId>,
    low: Bound<K>,
}

impl<'a, K> Iterator for Reverse<'a, K>
where
    K: Clone + Ord,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let key = self.tree.key(id);
        // check for lower bound
        let ok = match &self.low {
            Bound::Unbounded => true,
            Bound::Included(qow) => key >= qow,
            Bound::Excluded(qow) => key > qow,
        };
        if ok {
            self.next = self.tree.prev_id(id);
            Some(key)
        } else {
            self.next = None;
            None
        }
    }
}

/// Visiting order for [`Rbt::walk`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree. Keys come out sorted.
    InOrder,
    /// Breadth first, level by level from the root.
    LevelOrder,
}

/// Walk yields `(node, depth)` for every node in the tree, root is at
/// depth zero. Pending nodes are held in an explicit queue, so deep
/// trees do not grow the call stack.
pub struct Walk<'a, K>
where
    K: Clone + Ord,
{
    tree: &'a Rbt<K>,
    order: Order,
    pending: VecDeque<(NodeId, usize)>,
}

impl<'a, K> Walk<'a, K>
where
    K: Clone + Ord,
{
    pub(crate) fn new(tree: &'a Rbt<K>, order: Order) -> Walk<'a, K> {
        let mut walk = Walk {
            tree,
            order,
            pending: VecDeque::new(),
        };
        match (tree.root().map(|root| root.id()), order) {
            (None, _) => (),
            (Some(root), Order::InOrder) => walk.push_left_spine(root, 0),
            (Some(root), _) => walk.pending.push_back((root, 0)),
        }
        walk
    }

    fn push_left_spine(&mut self, mut id: NodeId, mut depth: usize) {
        loop {
            self.pending.push_back((id, depth));
            match self.tree.left_of(id) {
                Some(left) => {
                    id = left;
                    depth += 1;
                }
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for Walk<'a, K>
where
    K: Clone + Ord,
{
    type Item = (NodeRef<'a, K>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let (id, depth) = match self.order {
            Order::PreOrder => {
                let (id, depth) = self.pending.pop_back()?;
                // right first, so left is visited first.
                if let Some(child) = tree.right_of(id) {
                    self.pending.push_back((child, depth + 1));
                }
                if let Some(child) = tree.left_of(id) {
                    self.pending.push_back((child, depth + 1));
                }
                (id, depth)
            }
            Order::InOrder => {
                let (id, depth) = self.pending.pop_back()?;
                if let Some(child) = tree.right_of(id) {
                    self.push_left_spine(child, depth + 1);
                }
                (id, depth)
            }
            Order::LevelOrder => {
                let (id, depth) = self.pending.pop_front()?;
                if let Some(child) = tree.left_of(id) {
                    self.pending.push_back((child, depth + 1));
                }
                if let Some(child) = tree.right_of(id) {
                    self.pending.push_back((child, depth + 1));
                }
                (id, depth)
            }
        };
        Some((NodeRef::new(tree, id), depth))
    }
}
