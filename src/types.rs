//! Core identifiers shared across the indexing and retrieval pipeline.

use std::fmt;

/// A document identifier, assigned in ingestion order starting at 0.
///
/// Distinct from `WordId` (see [`crate::index::WordId`]) even though both
/// are thin `u32` wrappers, so the compiler catches a postings list being
/// confused with a vocabulary handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(pub u32);

impl DocId {
    /// This id as a `usize`, for indexing into per-document arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
