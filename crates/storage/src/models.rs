//! Database model for the `chunks` table.

use crate::error::StorageError;
use bytes::Bytes;
use shardfs_core::{ChunkId, ChunkRecord, FileId};
use sqlx::FromRow;

/// Fragment row, as stored in a shard's `chunks` table.
#[derive(Debug, Clone, FromRow)]
pub struct ChunkRow {
    pub id: String,
    pub files_id: String,
    pub n: i64,
    pub data: Vec<u8>,
}

impl TryFrom<ChunkRow> for ChunkRecord {
    type Error = StorageError;

    fn try_from(row: ChunkRow) -> Result<Self, Self::Error> {
        let n = u32::try_from(row.n).map_err(|_| StorageError::Corrupt {
            id: row.id.clone(),
            reason: format!("sequence number {} out of range", row.n),
        })?;

        Ok(ChunkRecord {
            id: ChunkId::new(row.id),
            files_id: FileId::new(row.files_id),
            n,
            data: Bytes::from(row.data),
        })
    }
}
