//! File metadata records.

use crate::hash::Md5Checksum;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Opaque identifier of a file record.
///
/// Chunk records reference their owning file through this id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Metadata describing one logical file.
///
/// The checksum and length describe the content reconstructed from the
/// file's fragments; readers verify both before releasing any bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    /// Lookup name. Retrieval keys are matched against it.
    pub filename: Option<String>,
    pub md5: Md5Checksum,
    /// Total content length in bytes.
    pub length: u64,
    /// Nominal fragment size. The last fragment may be shorter.
    pub chunk_size: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub upload_date: OffsetDateTime,
}

impl FileRecord {
    /// Number of fragments a file of this length and chunk size should have.
    ///
    /// Returns `None` when the chunk size is zero.
    pub fn expected_chunk_count(&self) -> Option<u64> {
        if self.chunk_size == 0 {
            return None;
        }
        Some(self.length.div_ceil(self.chunk_size))
    }
}
