//! Database models mapping to the metadata schema.

use crate::error::MetadataError;
use shardfs_core::{FileId, FileRecord, Md5Checksum};
use sqlx::FromRow;
use time::OffsetDateTime;

/// File record row, as stored in the `files` table.
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: String,
    pub filename: Option<String>,
    /// Lowercase hex MD5 of the full content.
    pub md5: String,
    pub length: i64,
    pub chunk_size: i64,
    pub upload_date: OffsetDateTime,
}

impl TryFrom<FileRow> for FileRecord {
    type Error = MetadataError;

    fn try_from(row: FileRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| MetadataError::Corrupt {
            id: row.id.clone(),
            reason,
        };

        let md5 = Md5Checksum::from_hex(&row.md5).map_err(|e| corrupt(e.to_string()))?;
        let length = u64::try_from(row.length)
            .map_err(|_| corrupt(format!("negative length {}", row.length)))?;
        let chunk_size = u64::try_from(row.chunk_size)
            .map_err(|_| corrupt(format!("negative chunk_size {}", row.chunk_size)))?;

        Ok(FileRecord {
            id: FileId::new(row.id),
            filename: row.filename,
            md5,
            length,
            chunk_size,
            upload_date: row.upload_date,
        })
    }
}
