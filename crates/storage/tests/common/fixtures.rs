use bytes::Bytes;
use shardfs_storage::SqliteChunkStore;
use std::path::Path;

/// Generate deterministic test data using a seeded pseudo-random generator
/// Same seed produces same output (reproducible tests)
#[allow(dead_code)]
pub fn seeded_bytes(seed: u64, len: usize) -> Bytes {
    let mut data = vec![0u8; len];
    let mut state = seed;

    // Simple LCG (Linear Congruential Generator)
    for chunk in data.chunks_mut(8) {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let bytes = state.to_le_bytes();
        for (i, byte) in chunk.iter_mut().enumerate() {
            *byte = bytes[i % 8];
        }
    }

    Bytes::from(data)
}

/// Open a fresh SQLite shard under `dir`.
#[allow(dead_code)]
pub async fn open_shard(dir: &Path, index: usize) -> SqliteChunkStore {
    SqliteChunkStore::new(dir.join(format!("shard-{index}.db")), None)
        .await
        .unwrap()
}

/// Insert one fragment row directly. There is no production write path.
#[allow(dead_code)]
pub async fn insert_chunk(store: &SqliteChunkStore, id: &str, files_id: &str, n: i64, data: &[u8]) {
    sqlx::query("INSERT INTO chunks (id, files_id, n, data) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(files_id)
        .bind(n)
        .bind(data)
        .execute(store.pool())
        .await
        .unwrap();
}
