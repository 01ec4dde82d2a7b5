use std::mem;

use log::{debug, trace};

use crate::node::{Color, NodeId};
use crate::rbt::Rbt;
use crate::rotate::Links;

/// Repair passes, run after a plain search-tree insert or delete has
/// left a local violation. Each step either terminates or moves the
/// violation one level closer to the root.
impl<K> Rbt<K>
where
    K: Clone + Ord,
{
    /// Fix a red-red edge introduced by attaching the red leaf `node`.
    pub(crate) fn fixup_insert(&mut self, mut node: NodeId) {
        while let Some(mut parent) = self.parent_of(node) {
            if self.node(parent).is_black() {
                break;
            }
            let grandparent = match self.parent_of(parent) {
                Some(grandparent) => grandparent,
                None => panic!("fixup_insert(): red root ? Call the programmer"),
            };
            let parent_is_left = self.left_of(grandparent) == Some(parent);
            let uncle = if parent_is_left {
                self.right_of(grandparent)
            } else {
                self.left_of(grandparent)
            };

            if self.is_red(uncle) {
                trace!("fixup_insert(): red uncle, recolour and climb");
                self.set_color(Some(parent), Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(Some(grandparent), Color::Red);
                node = grandparent;
                continue;
            }

            let inner = if parent_is_left {
                self.right_of(parent) == Some(node)
            } else {
                self.left_of(parent) == Some(node)
            };
            if inner {
                trace!("fixup_insert(): inner grandchild, align with parent");
                if parent_is_left {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                // node took parent's slot, parent is now its outer child.
                mem::swap(&mut node, &mut parent);
            }

            trace!("fixup_insert(): outer grandchild, rotate grandparent");
            if parent_is_left {
                self.rotate_right(grandparent);
            } else {
                self.rotate_left(grandparent);
            }
            self.set_color(Some(parent), Color::Black);
            self.set_color(Some(grandparent), Color::Red);
            break;
        }
        self.set_root_black();
    }

    /// Fix a black-height deficit of one at `node`, a child slot under
    /// `parent`. `node` is None when the removed node was a leaf, the
    /// vacated side is then the one `parent` no longer links.
    pub(crate) fn fixup_delete(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        loop {
            if self.is_red(node) {
                trace!("fixup_delete(): red node absorbs the deficit");
                self.set_color(node, Color::Black);
                break;
            }
            // at root every path lost one black, nothing to repair.
            let p = match parent {
                Some(p) => p,
                None => break,
            };

            let node_is_left = self.left_of(p) == node;
            let sibling = if node_is_left {
                self.right_of(p)
            } else {
                self.left_of(p)
            };
            let mut sibling = match sibling {
                Some(sibling) => sibling,
                None => {
                    debug!("{}: double black without sibling, climbing", self.name);
                    node = Some(p);
                    parent = self.parent_of(p);
                    continue;
                }
            };

            if self.is_red(Some(sibling)) {
                trace!("fixup_delete(): red sibling, rotate it over parent");
                self.set_color(Some(sibling), Color::Black);
                self.set_color(Some(p), Color::Red);
                if node_is_left {
                    self.rotate_left(p);
                } else {
                    self.rotate_right(p);
                }
                continue;
            }

            let (inner, outer) = if node_is_left {
                (self.left_of(sibling), self.right_of(sibling))
            } else {
                (self.right_of(sibling), self.left_of(sibling))
            };

            if !self.is_red(inner) && !self.is_red(outer) {
                trace!("fixup_delete(): black nephews, recolour sibling");
                self.set_color(Some(sibling), Color::Red);
                if self.is_red(Some(p)) {
                    self.set_color(Some(p), Color::Black);
                    break;
                }
                node = Some(p);
                parent = self.parent_of(p);
                continue;
            }

            if !self.is_red(outer) {
                trace!("fixup_delete(): red inner nephew, rotate it over sibling");
                self.set_color(inner, Color::Black);
                self.set_color(Some(sibling), Color::Red);
                sibling = if node_is_left {
                    self.rotate_right(sibling)
                } else {
                    self.rotate_left(sibling)
                };
            }

            trace!("fixup_delete(): red outer nephew, rotate sibling over parent");
            let outer = if node_is_left {
                self.right_of(sibling)
            } else {
                self.left_of(sibling)
            };
            let color = self.node(p).color;
            self.set_color(Some(sibling), color);
            self.set_color(Some(p), Color::Black);
            self.set_color(outer, Color::Black);
            if node_is_left {
                self.rotate_left(p);
            } else {
                self.rotate_right(p);
            }
            break;
        }
        self.set_root_black();
    }
}
