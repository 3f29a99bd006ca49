//! This crate provides a persistent priority search queue: a map-like
//! structure that is simultaneously a search tree over its keys and a
//! min-heap over its values.
//!
//! [`Pennant`] stores the globally minimal binding as the "winner" of a
//! tournament and everything else in a weight-balanced "loser tree", so
//! peeking at the minimum is O(1) while keyed lookup, insertion, deletion and
//! min-extraction are all O(log n). Clones are cheap and share all
//! unmodified subtrees, like the other persimmon structures.

pub mod pennant;

mod balance;

/// An error from a queue operation whose precondition didn't hold.
///
/// Checked before any mutation; an operation returning `Err` leaves the queue
/// untouched. The `Option`-returning counterparts ([`Pennant::get`],
/// [`Pennant::min`]) signal plain absence instead.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("key not found")]
    KeyNotFound,

    #[error("the queue is empty")]
    Empty,

    #[error("bindings were not in strictly ascending key order")]
    Unsorted,
}

pub use pennant::Pennant;
