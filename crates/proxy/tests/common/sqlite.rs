use shardfs_core::{ChunkRecord, FileRecord};
use shardfs_metadata::SqliteStore;
use shardfs_storage::SqliteChunkStore;

/// Insert a file record row directly. There is no production write path.
#[allow(dead_code)]
pub async fn insert_file(store: &SqliteStore, record: &FileRecord) {
    sqlx::query(
        "INSERT INTO files (id, filename, md5, length, chunk_size, upload_date) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(record.id.as_str())
    .bind(record.filename.as_deref())
    .bind(record.md5.to_hex())
    .bind(record.length as i64)
    .bind(record.chunk_size as i64)
    .bind(record.upload_date)
    .execute(store.pool())
    .await
    .unwrap();
}

/// Insert a fragment row directly.
#[allow(dead_code)]
pub async fn insert_chunk(store: &SqliteChunkStore, chunk: &ChunkRecord) {
    sqlx::query("INSERT INTO chunks (id, files_id, n, data) VALUES (?, ?, ?, ?)")
        .bind(chunk.id.as_str())
        .bind(chunk.files_id.as_str())
        .bind(chunk.n as i64)
        .bind(chunk.data.as_ref())
        .execute(store.pool())
        .await
        .unwrap();
}

/// Insert a fragment row with an arbitrary sequence value, including ones
/// no valid chunk record can carry.
#[allow(dead_code)]
pub async fn insert_raw_chunk(
    store: &SqliteChunkStore,
    id: &str,
    files_id: &str,
    n: i64,
    data: &[u8],
) {
    sqlx::query("INSERT INTO chunks (id, files_id, n, data) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(files_id)
        .bind(n)
        .bind(data)
        .execute(store.pool())
        .await
        .unwrap();
}
