use bytes::Bytes;
use shardfs_core::{ChunkId, ChunkRecord, FileId, FileRecord, Md5Checksum, Sha1Digest};
use time::OffsetDateTime;

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

/// Hex SHA-1 of data, the retrieval key for that content.
#[allow(dead_code)]
pub fn sha1_key(data: &[u8]) -> String {
    Sha1Digest::compute(data).to_hex()
}

/// A file record describing `data`.
#[allow(dead_code)]
pub fn file_record(id: &str, filename: Option<&str>, data: &[u8], chunk_size: u64) -> FileRecord {
    FileRecord {
        id: FileId::new(id),
        filename: filename.map(str::to_string),
        md5: Md5Checksum::compute(data),
        length: data.len() as u64,
        chunk_size,
        upload_date: OffsetDateTime::now_utc(),
    }
}

/// Split `data` into fragments of `chunk_size` bytes (the last may be shorter).
#[allow(dead_code)]
pub fn split_fixed(files_id: &FileId, data: &Bytes, chunk_size: usize) -> Vec<ChunkRecord> {
    let sizes: Vec<usize> = data.chunks(chunk_size).map(<[u8]>::len).collect();
    split_sizes(files_id, data, &sizes)
}

/// Split `data` into fragments with the given sizes, which must sum to its length.
#[allow(dead_code)]
pub fn split_sizes(files_id: &FileId, data: &Bytes, sizes: &[usize]) -> Vec<ChunkRecord> {
    assert_eq!(sizes.iter().sum::<usize>(), data.len(), "sizes must cover data");
    let mut offset = 0;
    sizes
        .iter()
        .enumerate()
        .map(|(n, &size)| {
            let chunk = ChunkRecord {
                id: ChunkId::new(format!("{files_id}-{n}")),
                files_id: files_id.clone(),
                n: n as u32,
                data: data.slice(offset..offset + size),
            };
            offset += size;
            chunk
        })
        .collect()
}
