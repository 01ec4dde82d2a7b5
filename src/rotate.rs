/// Rotate is the public restructuring capability of a binary tree that
/// keeps parent back-references. Rotations preserve the in-order key
/// sequence and never recolour, colouring is left to the caller.
///
/// Only rotations are public, links can not be rewired from outside:
///
/// ```compile_fail
/// use rbtree_index::{Rbt, Rotate};
///
/// let mut rbt = Rbt::load_from("myinstance", 0..100);
/// let root = rbt.root().unwrap().id();
/// rbt.set_left(root, None);
/// ```
pub trait Rotate {
    type Id;

    /// Promote the right child of `node` into its position, returns the
    /// promoted child. Panics if `node` is not in the tree or has no
    /// right child.
    fn rotate_left(&mut self, node: Self::Id) -> Self::Id;

    /// Mirror of [`Rotate::rotate_left`].
    fn rotate_right(&mut self, node: Self::Id) -> Self::Id;
}

/// Links is the slot level shape of a parent-linked binary tree.
/// Implementors supply accessors, the provided methods keep every
/// `parent` link in agreement with the owning `left`/`right` link.
pub(crate) trait Links {
    type Id: Copy + PartialEq;
    type Key;

    /// Make `id` the root, clearing its parent link.
    fn set_root(&mut self, id: Option<Self::Id>);

    fn key(&self, id: Self::Id) -> &Self::Key;

    fn left_of(&self, id: Self::Id) -> Option<Self::Id>;

    fn right_of(&self, id: Self::Id) -> Option<Self::Id>;

    fn parent_of(&self, id: Self::Id) -> Option<Self::Id>;

    /// Attach `child` as left child of `id`, child's parent becomes `id`.
    fn set_left(&mut self, id: Self::Id, child: Option<Self::Id>);

    /// Attach `child` as right child of `id`, child's parent becomes `id`.
    fn set_right(&mut self, id: Self::Id, child: Option<Self::Id>);

    /// Put `new` in the structural slot held by `old` under `parent`. A
    /// `None` parent means `old` was the root.
    fn replace_child(&mut self, parent: Option<Self::Id>, old: Self::Id, new: Option<Self::Id>) {
        match parent {
            None => self.set_root(new),
            Some(p) if self.left_of(p) == Some(old) => self.set_left(p, new),
            Some(p) if self.right_of(p) == Some(old) => self.set_right(p, new),
            Some(_) => panic!("replace_child(): node is not a child of its parent, call the programmer"),
        }
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x              node      xr
    //                   / \             /  \
    //                 xl   xr        left   xl
    //
    /// Promote the right child into the position of `node`, returns the
    /// promoted child.
    fn rotate_left(&mut self, node: Self::Id) -> Self::Id {
        let x = match self.right_of(node) {
            Some(x) => x,
            None => panic!("rotate_left(): no right child to promote, call the programmer"),
        };
        let parent = self.parent_of(node);
        let xl = self.left_of(x);
        self.set_right(node, xl);
        self.replace_child(parent, node, Some(x));
        self.set_left(x, Some(node));
        x
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x      right             xl      node
    //          / \                               / \
    //        xl   xr                           xr  right
    //
    /// Promote the left child into the position of `node`, returns the
    /// promoted child.
    fn rotate_right(&mut self, node: Self::Id) -> Self::Id {
        let x = match self.left_of(node) {
            Some(x) => x,
            None => panic!("rotate_right(): no left child to promote, call the programmer"),
        };
        let parent = self.parent_of(node);
        let xr = self.right_of(x);
        self.set_left(node, xr);
        self.replace_child(parent, node, Some(x));
        self.set_right(x, Some(node));
        x
    }
}
