//! This crate provides a persistent vector (also known as a "bitmapped vector
//! trie") with cheap clones and efficient copy-on-write modifications.
//!
//! [`Vector`] is the persistent type: every mutation copies only the path from
//! the root to the touched leaf, sharing everything else with older versions.
//! A small tail buffer outside the tree keeps appends O(1) amortized.
//! [`Transient`] is a move-only builder for bulk construction; it mutates its
//! tail in place and is consumed when frozen back into a [`Vector`], so a
//! stale builder can't be reused after freezing.

pub mod transient;
pub mod vector;

mod metrics;

/// [`Vector`] takes a "branching factor" parameter, which must be a
/// reasonably-sized power of two. We use this trait to enforce that.
pub trait ValidBranchingConstant {}
pub struct Const<const N: usize> {}

impl ValidBranchingConstant for Const<2> {}
impl ValidBranchingConstant for Const<4> {}
impl ValidBranchingConstant for Const<8> {}
impl ValidBranchingConstant for Const<16> {}
impl ValidBranchingConstant for Const<32> {}
impl ValidBranchingConstant for Const<64> {}
impl ValidBranchingConstant for Const<128> {}

/// An error from a vector operation that was given unusable arguments.
///
/// These are contract violations detected before any mutation takes place:
/// an operation that returns `Err` leaves the vector untouched. Operations
/// where absence is an expected outcome have `Option`-returning counterparts
/// ([`Vector::get`], [`Vector::pop`]) instead.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} out of bounds for a vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("the vector is empty")]
    Empty,

    #[error("length mismatch: {left} elements on the left, {right} on the right")]
    LengthMismatch { left: usize, right: usize },
}

pub use transient::Transient;
pub use vector::Vector;
