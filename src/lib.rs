//! Ordered containers on top of an arena-backed red-black tree.
//!
//! [`RBTree`] is the core: it keeps the balancing invariants, hands out stable [`Position`]s and
//! enforces a [`DuplicatePolicy`]. [`Set`], [`MultiSet`], [`Map`] and [`MultiMap`] are thin
//! wrappers that fix the policy and shape the API.
#![forbid(unsafe_code)]

// the balanced tree
pub mod rbtree;

// containers built on it
pub mod map;
pub mod set;

mod error;

pub use error::TreeError;
pub use map::{Map, MultiMap};
pub use rbtree::{Compare, DuplicatePolicy, InvariantViolation, Natural, Position, RBTree, RevPosition, Reversed};
pub use set::{MultiSet, Set};
