use std::{fmt, ptr};

use crate::rbt::Rbt;
use crate::rotate::Links;

/// Slot of a node inside the tree's arena. Stays stable for the life of
/// the entry, rotations only rewire links around it.
pub type NodeId = usize;

/// Colour tag on every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Node corresponds to a single entry in [`Rbt`] instance. Children are
/// owned by the tree's arena, `parent` is a back-reference that always
/// agrees with the owning `left`/`right` link of the parent.
#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) color: Color,
    pub(crate) left: Option<NodeId>,   // store: left child
    pub(crate) right: Option<NodeId>,  // store: right child
    pub(crate) parent: Option<NodeId>, // store: owner of this node
}

impl<K> Node<K> {
    // CREATE operation, nodes are born red and detached.
    pub(crate) fn new(key: K) -> Node<K> {
        Node {
            key,
            color: Color::Red,
            left: None,
            right: None,
            parent: None,
        }
    }

    #[inline]
    pub(crate) fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    pub(crate) fn is_black(&self) -> bool {
        self.color == Color::Black
    }
}

/// Read-only handle to a node inside an [`Rbt`] instance. Handles borrow
/// the tree, so the shape cannot change while one is alive.
pub struct NodeRef<'a, K>
where
    K: Clone + Ord,
{
    tree: &'a Rbt<K>,
    id: NodeId,
}

impl<'a, K> Clone for NodeRef<'a, K>
where
    K: Clone + Ord,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for NodeRef<'a, K> where K: Clone + Ord {}

impl<'a, K> NodeRef<'a, K>
where
    K: Clone + Ord,
{
    pub(crate) fn new(tree: &'a Rbt<K>, id: NodeId) -> NodeRef<'a, K> {
        NodeRef { tree, id }
    }

    fn wrap(&self, id: Option<NodeId>) -> Option<NodeRef<'a, K>> {
        id.map(|id| NodeRef::new(self.tree, id))
    }

    /// Arena slot of this node, valid for [`Rotate`](crate::Rotate) calls on the same tree.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn key(&self) -> &'a K {
        self.tree.key(self.id)
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.tree.node(self.id).color
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    #[inline]
    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.wrap(self.tree.left_of(self.id))
    }

    #[inline]
    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.wrap(self.tree.right_of(self.id))
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeRef<'a, K>> {
        self.wrap(self.tree.parent_of(self.id))
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    /// Left most node in the subtree rooted at this node.
    pub fn min(&self) -> NodeRef<'a, K> {
        NodeRef::new(self.tree, self.tree.min_id(self.id))
    }

    /// Right most node in the subtree rooted at this node.
    pub fn max(&self) -> NodeRef<'a, K> {
        NodeRef::new(self.tree, self.tree.max_id(self.id))
    }

    /// Next node in key order. Minimum of the right subtree if there is
    /// one, otherwise the first ancestor reached from a left child.
    pub fn successor(&self) -> Option<NodeRef<'a, K>> {
        self.wrap(self.tree.next_id(self.id))
    }

    /// Previous node in key order, mirror of [`NodeRef::successor`].
    pub fn predecessor(&self) -> Option<NodeRef<'a, K>> {
        self.wrap(self.tree.prev_id(self.id))
    }
}

impl<'a, K> PartialEq for NodeRef<'a, K>
where
    K: Clone + Ord,
{
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'a, K> fmt::Debug for NodeRef<'a, K>
where
    K: Clone + Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}({:?})", self.key(), self.color())
    }
}
