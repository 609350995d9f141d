//! Chunk (fragment) records.

use crate::file::FileId;
use std::fmt;

/// Opaque identifier of a single fragment.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ChunkId(String);

impl ChunkId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({})", self.0)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ordered fragment of a file's content.
#[derive(Clone)]
pub struct ChunkRecord {
    pub id: ChunkId,
    /// Owning file. A back-reference only; the chunk store owns the fragment.
    pub files_id: FileId,
    /// Position of this fragment within the file.
    pub n: u32,
    pub data: bytes::Bytes,
}

impl ChunkRecord {
    /// Fragment size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for ChunkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkRecord")
            .field("id", &self.id)
            .field("files_id", &self.files_id)
            .field("n", &self.n)
            .field("size", &self.data.len())
            .finish()
    }
}
