/// Error enumerates over all possible errors that this package
/// shall return.
///
/// Only [`Error::EmptyTree`] is returned by regular queries, all other
/// variants are reported by [`Rbt::validate`](crate::Rbt::validate) and
/// point at a broken tree.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error<K> {
    /// Query needs at least one entry, like min() / max().
    #[error("tree is empty")]
    EmptyTree,
    /// Fatal case, root node is coloured red.
    #[error("root {0:?} is red")]
    RedRoot(K),
    /// Fatal case, a red node has a red child.
    #[error("red node {parent:?} has red child {child:?}")]
    ConsecutiveReds { parent: K, child: K },
    /// Fatal case, number of blacks differ under left and right child.
    /// The String component can be used for debugging.
    #[error("unbalanced blacks, {0}")]
    UnbalancedBlacks(String),
    /// Fatal case, index entries are not in sort-order.
    #[error("keys out of order {0:?} {1:?}")]
    SortError(K, K),
    /// Fatal case, parent back-reference does not match the owning link.
    #[error("parent link broken at {0:?}")]
    BrokenParentLink(K),
    /// Fatal case, entry count does not match the nodes reachable from root.
    #[error("entry count mismatch, expected {expected} found {found}")]
    CountMismatch { expected: usize, found: usize },
}
