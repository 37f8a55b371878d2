use thiserror::Error;


/// Misuse of a tree position, or a failed node allocation.
///
/// Lookup misses, duplicate inserts under [`DuplicatePolicy::Unique`](crate::DuplicatePolicy::Unique) and
/// erasing an absent key are *not* errors, those come back as ordinary values.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The past-the-end position was dereferenced, erased, or stepped forward.
    #[error("the end position does not name an element")]
    EndPosition,
    /// The position names an element that has since been erased.
    #[error("the position refers to an element that was erased")]
    StalePosition,
    /// The end of a range could not be reached from its start.
    #[error("the range end is not reachable from the range start")]
    InvalidRange,
    /// Allocating a new node failed. The tree is left untouched.
    #[error("out of memory while allocating a tree node")]
    OutOfMemory,
}
