mod depth;
mod error;
mod iter;
mod node;
mod rbt;
mod rebalance;
mod rotate;

pub use crate::depth::Depth;
pub use crate::error::Error;
pub use crate::iter::{Iter, Order, Range, Reverse, Walk};
pub use crate::node::{Color, NodeId, NodeRef};
pub use crate::rbt::{Rbt, Stats};
pub use crate::rotate::Rotate;
