use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    mem,
    ops::{Bound, RangeBounds},
};

use log::debug;
use rand::Rng;
use slab::Slab;

use crate::depth::Depth;
use crate::error::Error;
use crate::iter::{Iter, Order, Range, Walk};
use crate::node::{Color, Node, NodeId, NodeRef};
use crate::rotate::{Links, Rotate};

/// Rbt manage a single instance of in-memory index using
/// [red-black][rbtree] tree. Nodes keep a back-reference to their
/// parent, and balance is restored after every insert and delete by
/// recolouring and rotating upward from the point of violation.
///
/// [rbtree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct Rbt<K>
where
    K: Clone + Ord,
{
    pub(crate) name: String,
    nodes: Slab<Node<K>>,
    root: Option<NodeId>,
    n_count: usize, // number of entries in the tree.
}

/// Different ways to construct a new Rbt instance.
impl<K> Rbt<K>
where
    K: Clone + Ord,
{
    /// Create an empty instance of Rbt, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> Rbt<K>
    where
        S: AsRef<str>,
    {
        Rbt {
            name: name.as_ref().to_string(),
            nodes: Slab::new(),
            root: Default::default(),
            n_count: Default::default(),
        }
    }

    /// Create a new tree with `key` as its black root, then insert
    /// `keys` one at a time in the given order. Insertion order shapes
    /// the tree, not the set of keys held by it.
    pub fn new_tree<S, I>(name: S, key: K, keys: I) -> Rbt<K>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = K>,
    {
        let mut rbt = Rbt::new(name);
        let id = rbt.nodes.insert(Node::new(key));
        rbt.nodes[id].set_black();
        rbt.set_root(Some(id));
        rbt.n_count = 1;
        keys.into_iter().for_each(|key| {
            rbt.insert(key);
        });
        rbt
    }

    /// Create a new instance of Rbt tree and load it with keys from
    /// `iter`. Duplicate keys are ignored.
    pub fn load_from<S, I>(name: S, iter: I) -> Rbt<K>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = K>,
    {
        let mut rbt = Rbt::new(name);
        for key in iter {
            rbt.insert(key);
        }
        rbt
    }
}

/// Maintenance API.
impl<K> Rbt<K>
where
    K: Clone + Ord,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Rbt instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.n_count = 0;
    }

    /// Return quickly with basic statisics, only entries() method is valid
    /// with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, mem::size_of::<Node<K>>())
    }
}

/// Write operations on Rbt instance.
impl<K> Rbt<K>
where
    K: Clone + Ord,
{
    /// Insert `key` into the index. Return false if key is already
    /// present, in which case the tree is left untouched.
    pub fn insert(&mut self, key: K) -> bool {
        let (mut parent, mut go_left) = (None, false);
        let mut node = self.root;
        while let Some(id) = node {
            parent = Some(id);
            node = match key.cmp(&self.nodes[id].key) {
                Ordering::Less => {
                    go_left = true;
                    self.nodes[id].left
                }
                Ordering::Greater => {
                    go_left = false;
                    self.nodes[id].right
                }
                Ordering::Equal => {
                    debug!("{}: insert on existing key, no-op", self.name);
                    return false;
                }
            };
        }

        let id = self.nodes.insert(Node::new(key));
        match parent {
            None => self.set_root(Some(id)),
            Some(p) if go_left => self.set_left(p, Some(id)),
            Some(p) => self.set_right(p, Some(id)),
        }
        self.n_count += 1;

        self.fixup_insert(id);
        true
    }

    /// Delete key from this instance. If key is not present, then delete
    /// is effectively a no-op and returns false.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.find_id(key) {
            Some(id) => {
                self.remove(id);
                self.n_count -= 1;
                true
            }
            None => {
                debug!("{}: delete on missing key, no-op", self.name);
                false
            }
        }
    }

    fn remove(&mut self, mut id: NodeId) {
        let node = &self.nodes[id];
        if let (Some(_), Some(right)) = (node.left, node.right) {
            // swap in the successor's key, then unlink the successor,
            // which has no left child.
            let succ = self.min_id(right);
            match self.nodes.get2_mut(id, succ) {
                Some((node, succ)) => mem::swap(&mut node.key, &mut succ.key),
                None => panic!("remove(): successor aliases node, call the programmer"),
            }
            id = succ;
        }

        let node = &self.nodes[id];
        let (parent, child) = (node.parent, node.left.or(node.right));
        self.replace_child(parent, id, child);
        let node = self.nodes.remove(id);

        if node.is_black() {
            self.fixup_delete(child, parent);
        }
    }

    /// Validate red-black tree with following rules:
    ///
    /// * Root node is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order.
    /// * Every child points back to its parent.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>> {
        let mut stats = Stats::new(self.n_count, mem::size_of::<Node<K>>());
        stats.set_depths(Depth::new());

        if let Some(root) = self.root {
            let node = &self.nodes[root];
            if node.parent.is_some() {
                return Err(Error::BrokenParentLink(node.key.clone()));
            }
            if !node.is_black() {
                return Err(Error::RedRoot(node.key.clone()));
            }
        }

        let mut walk = Validate {
            prev: None,
            count: 0,
            stats: &mut stats,
        };
        let blacks = self.validate_tree(self.root, None, 0, 0, &mut walk)?;
        if walk.count != self.n_count {
            let (expected, found) = (self.n_count, walk.count);
            return Err(Error::CountMismatch { expected, found });
        }
        stats.set_blacks(blacks);
        Ok(stats)
    }

    fn validate_tree(
        &self,
        node: Option<NodeId>,
        parent: Option<NodeId>,
        mut nb: usize,
        depth: usize,
        walk: &mut Validate<K>,
    ) -> Result<usize, Error<K>> {
        let id = match node {
            None => {
                if let Some(depths) = walk.stats.depths.as_mut() {
                    depths.sample(depth);
                }
                return Ok(nb);
            }
            Some(id) => id,
        };

        let node = &self.nodes[id];
        if node.parent != parent {
            return Err(Error::BrokenParentLink(node.key.clone()));
        }
        let red = !node.is_black();
        match parent {
            Some(p) if red && self.is_red(parent) => {
                let parent = self.nodes[p].key.clone();
                let child = node.key.clone();
                return Err(Error::ConsecutiveReds { parent, child });
            }
            _ if !red => nb += 1,
            _ => (),
        }

        let lblacks = self.validate_tree(node.left, Some(id), nb, depth + 1, walk)?;
        // in-order position, keys must strictly increase.
        if let Some(prev) = walk.prev.take() {
            if prev >= node.key {
                return Err(Error::SortError(prev, node.key.clone()));
            }
        }
        walk.prev = Some(node.key.clone());
        walk.count += 1;
        let rblacks = self.validate_tree(node.right, Some(id), nb, depth + 1, walk)?;

        if lblacks != rblacks {
            let err = format!("left: {} right: {}", lblacks, rblacks);
            return Err(Error::UnbalancedBlacks(err));
        }
        Ok(lblacks)
    }
}

/// Read operations on Rbt instance.
impl<K> Rbt<K>
where
    K: Clone + Ord,
{
    /// Return the root node, if any.
    pub fn root(&self) -> Option<NodeRef<K>> {
        self.root.map(|id| NodeRef::new(self, id))
    }

    /// Find the node holding key.
    pub fn find<Q>(&self, key: &Q) -> Option<NodeRef<K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(key).map(|id| NodeRef::new(self, id))
    }

    /// Check whether key is present in the index.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(key).is_some()
    }

    /// Return the node with the smallest key.
    pub fn min(&self) -> Result<NodeRef<K>, Error<K>> {
        match self.root {
            Some(root) => Ok(NodeRef::new(self, self.min_id(root))),
            None => Err(Error::EmptyTree),
        }
    }

    /// Return the node with the largest key.
    pub fn max(&self) -> Result<NodeRef<K>, Error<K>> {
        match self.root {
            Some(root) => Ok(NodeRef::new(self, self.max_id(root))),
            None => Err(Error::EmptyTree),
        }
    }

    /// Return the node with the smallest key strictly greater than `key`.
    /// `key` itself need not be present in the index.
    pub fn successor<Q>(&self, key: &Q) -> Result<Option<NodeRef<K>>, Error<K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.root.is_none() {
            return Err(Error::EmptyTree);
        }
        let bound = Bound::Excluded(key);
        Ok(self.lower_bound(bound).map(|id| NodeRef::new(self, id)))
    }

    /// Return the node with the largest key strictly less than `key`.
    /// `key` itself need not be present in the index.
    pub fn predecessor<Q>(&self, key: &Q) -> Result<Option<NodeRef<K>>, Error<K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.root.is_none() {
            return Err(Error::EmptyTree);
        }
        let bound = Bound::Excluded(key);
        Ok(self.upper_bound(bound).map(|id| NodeRef::new(self, id)))
    }

    /// Number of nodes on the longest path from root to a leaf, zero for
    /// an empty tree.
    pub fn height(&self) -> usize {
        self.walk(Order::PreOrder)
            .filter(|(node, _)| node.is_leaf())
            .map(|(_, depth)| depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Return a random entry from this index.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<NodeRef<K>> {
        let mut id = self.root?;

        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = match rng.gen::<u8>() % 2 {
                0 => self.nodes[id].left,
                _ => self.nodes[id].right,
            };
            match next {
                Some(next) if at_depth > 0 => {
                    at_depth -= 1;
                    id = next;
                }
                _ => break Some(NodeRef::new(self, id)),
            }
        }
    }

    /// Return an iterator over all keys in this instance, in sort order.
    pub fn iter(&self) -> Iter<K> {
        Iter::new(self, self.root.map(|root| self.min_id(root)))
    }

    /// Range over all keys from low to high. Call `rev()` on the returned
    /// iterator to range from high to low.
    pub fn range<Q, R>(&self, range: R) -> Range<K>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ToOwned<Owned = K> + ?Sized,
    {
        let low: Bound<K> = match range.start_bound() {
            Bound::Included(key) => Bound::Included(key.to_owned()),
            Bound::Excluded(key) => Bound::Excluded(key.to_owned()),
            Bound::Unbounded => Bound::Unbounded,
        };
        let high: Bound<K> = match range.end_bound() {
            Bound::Included(key) => Bound::Included(key.to_owned()),
            Bound::Excluded(key) => Bound::Excluded(key.to_owned()),
            Bound::Unbounded => Bound::Unbounded,
        };
        Range::new(self, low, high)
    }

    /// Lazy traversal yielding `(node, depth)` pairs, root at depth zero.
    /// Each call starts afresh from the root.
    pub fn walk(&self, order: Order) -> Walk<K> {
        Walk::new(self, order)
    }
}

// Shape helpers, on arena slots.
impl<K> Rbt<K>
where
    K: Clone + Ord,
{
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id]
    }

    pub(crate) fn set_root_black(&mut self) {
        if let Some(root) = self.root {
            self.nodes[root].set_black();
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, id: Option<NodeId>) -> bool {
        id.map_or(false, |id| !self.nodes[id].is_black())
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self.nodes[id].color = color
        }
    }

    fn find_id<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while let Some(id) = node {
            let nref = &self.nodes[id];
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right,
                Ordering::Greater => nref.left,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    pub(crate) fn min_id(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    pub(crate) fn max_id(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        id
    }

    pub(crate) fn next_id(&self, mut id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.nodes[id].right {
            return Some(self.min_id(right));
        }
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if self.nodes[p].left == Some(id) {
                break;
            }
            id = p;
            parent = self.nodes[p].parent;
        }
        parent
    }

    pub(crate) fn prev_id(&self, mut id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.nodes[id].left {
            return Some(self.max_id(left));
        }
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if self.nodes[p].right == Some(id) {
                break;
            }
            id = p;
            parent = self.nodes[p].parent;
        }
        parent
    }

    /// Left most node whose key lies above `low`.
    pub(crate) fn lower_bound<Q>(&self, low: Bound<&Q>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut node, mut found) = (self.root, None);
        while let Some(id) = node {
            let key = self.nodes[id].key.borrow();
            let above = match low {
                Bound::Included(low) => key >= low,
                Bound::Excluded(low) => key > low,
                Bound::Unbounded => true,
            };
            node = if above {
                found = Some(id);
                self.nodes[id].left
            } else {
                self.nodes[id].right
            };
        }
        found
    }

    /// Right most node whose key lies below `high`.
    pub(crate) fn upper_bound<Q>(&self, high: Bound<&Q>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut node, mut found) = (self.root, None);
        while let Some(id) = node {
            let key = self.nodes[id].key.borrow();
            let below = match high {
                Bound::Included(high) => key <= high,
                Bound::Excluded(high) => key < high,
                Bound::Unbounded => true,
            };
            node = if below {
                found = Some(id);
                self.nodes[id].right
            } else {
                self.nodes[id].left
            };
        }
        found
    }
}

impl<K> Rotate for Rbt<K>
where
    K: Clone + Ord,
{
    type Id = NodeId;

    fn rotate_left(&mut self, node: NodeId) -> NodeId {
        if !self.nodes.contains(node) {
            panic!("rotate_left(): {} not in {}, call the programmer", node, self.name);
        }
        Links::rotate_left(self, node)
    }

    fn rotate_right(&mut self, node: NodeId) -> NodeId {
        if !self.nodes.contains(node) {
            panic!("rotate_right(): {} not in {}, call the programmer", node, self.name);
        }
        Links::rotate_right(self, node)
    }
}

impl<K> Links for Rbt<K>
where
    K: Clone + Ord,
{
    type Id = NodeId;
    type Key = K;

    fn set_root(&mut self, id: Option<NodeId>) {
        self.root = id;
        if let Some(id) = id {
            self.nodes[id].parent = None;
        }
    }

    #[inline]
    fn key(&self, id: NodeId) -> &K {
        &self.nodes[id].key
    }

    #[inline]
    fn left_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].left
    }

    #[inline]
    fn right_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].right
    }

    #[inline]
    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id].left = child;
        if let Some(child) = child {
            self.nodes[child].parent = Some(id);
        }
    }

    fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id].right = child;
        if let Some(child) = child {
            self.nodes[child].parent = Some(id);
        }
    }
}

// running state for validate_tree's in-order walk.
struct Validate<'a, K> {
    prev: Option<K>,
    count: usize,
    stats: &'a mut Stats,
}

/// Statistics on [`Rbt`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Rbt::stats`] method.
/// * To get full statisics via [`Rbt::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Rbt`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Rbt<K>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key type. EG:
    ///
    /// ```
    /// use rbtree_index::Rbt;
    /// let rbt: Rbt<u64> = Rbt::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // three optional links and a colour tag: 56 bytes
    /// assert_eq!(rbt.stats().node_size(), 64);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return black-height, number of black nodes from root to any leaf.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics, available only after validate().
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
