//! Errors reported by the indexed engines.

use std::fmt;

/// Error returned when an index lies outside the range an operation accepts.
///
/// Negative indices count from the end, so on a vector of size `n` every
/// index in `-n..n` resolves. An index below `-n` (or, for operations that
/// cannot grow the vector, above `n`) yields this error.
///
/// # Examples
///
/// ```rust
/// use perseus::persistent::{IndexOutOfRange, VectorTrie};
///
/// let vector: VectorTrie<i32> = (0..3).collect();
/// assert_eq!(vector.at(-4), Err(IndexOutOfRange { index: -4, size: 3 }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfRange {
    /// The index as given by the caller.
    pub index: isize,
    /// The size of the collection at the time of the call.
    pub size: usize,
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "index {} out of range for collection of size {}",
            self.index, self.size
        )
    }
}

impl std::error::Error for IndexOutOfRange {}
