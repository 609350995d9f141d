//! Scatter-gather reassembly of a file from its fragments.
//!
//! Every shard is queried for the file's fragments concurrently. The
//! fragments are merged, ordered by sequence number and concatenated, and the
//! result is released only after its length and MD5 match the file record.

use crate::error::{IntegrityError, ProxyError, ProxyResult};
use bytes::{Bytes, BytesMut};
use futures::future::join_all;
use shardfs_core::{ChunkRecord, FileRecord, Md5Checksum};
use shardfs_storage::{ChunkStore, StorageError};
use std::sync::Arc;
use tracing::{Instrument, Span};

/// A fragment together with the shard it was read from.
#[derive(Debug, Clone)]
pub struct ShardFragment {
    pub shard: usize,
    pub chunk: ChunkRecord,
}

/// Reads and verifies file content from a set of chunk shards.
pub struct Reconstructor<'a> {
    shards: &'a [Arc<dyn ChunkStore>],
}

impl<'a> Reconstructor<'a> {
    pub fn new(shards: &'a [Arc<dyn ChunkStore>]) -> Self {
        Self { shards }
    }

    /// Reassemble and verify the content described by `record`.
    ///
    /// Read-only on every shard. Any shard failure aborts the read.
    pub async fn read(&self, record: &FileRecord) -> ProxyResult<Bytes> {
        let span = tracing::info_span!(
            "reconstruct",
            file = %record.id,
            length = record.length,
            shards = self.shards.len(),
            fragments = tracing::field::Empty,
        );

        async move {
            let fragments = self.gather(record).await?;
            Span::current().record("fragments", fragments.len());

            if let Some(expected) = record.expected_chunk_count()
                && expected != fragments.len() as u64
            {
                tracing::debug!(
                    expected,
                    found = fragments.len(),
                    "fragment count differs from nominal chunk size"
                );
            }

            assemble(record, fragments).map_err(|err| {
                tracing::error!(error = %err, "reconstructed content failed verification");
                ProxyError::Integrity(err)
            })
        }
        .instrument(span)
        .await
    }

    /// Query every shard and merge the results, tagging each fragment with its shard.
    async fn gather(&self, record: &FileRecord) -> ProxyResult<Vec<ShardFragment>> {
        let lookups = self
            .shards
            .iter()
            .map(|store| store.find_chunks(&record.id));
        let results = join_all(lookups).await;

        let mut fragments = Vec::new();
        for (shard, result) in results.into_iter().enumerate() {
            match result {
                Ok(chunks) => {
                    tracing::trace!(shard, count = chunks.len(), "shard returned fragments");
                    fragments.extend(chunks.into_iter().map(|chunk| ShardFragment { shard, chunk }));
                }
                Err(StorageError::Corrupt { id, reason }) => {
                    let err = IntegrityError::CorruptFragment {
                        file: record.id.clone(),
                        shard,
                        chunk: id,
                        reason,
                    };
                    tracing::error!(shard, error = %err, "shard returned an undecodable fragment");
                    return Err(ProxyError::Integrity(err));
                }
                Err(source) => {
                    tracing::warn!(shard, error = %source, "chunk shard lookup failed");
                    return Err(ProxyError::Storage { shard, source });
                }
            }
        }
        Ok(fragments)
    }
}

/// Order, concatenate and verify fragments gathered for `record`.
///
/// Checks run in order: duplicate sequence numbers, gaps, total length, MD5.
pub fn assemble(
    record: &FileRecord,
    mut fragments: Vec<ShardFragment>,
) -> Result<Bytes, IntegrityError> {
    fragments.sort_by_key(|f| (f.chunk.n, f.shard));

    for pair in fragments.windows(2) {
        if pair[0].chunk.n == pair[1].chunk.n {
            let n = pair[0].chunk.n;
            let shards = fragments
                .iter()
                .filter(|f| f.chunk.n == n)
                .map(|f| f.shard)
                .collect();
            return Err(IntegrityError::DuplicateSequence {
                file: record.id.clone(),
                n,
                shards,
            });
        }
    }

    for (expected, fragment) in fragments.iter().enumerate() {
        let expected = expected as u32;
        if fragment.chunk.n != expected {
            return Err(IntegrityError::MissingSequence {
                file: record.id.clone(),
                expected,
                found: Some(fragment.chunk.n),
            });
        }
    }

    let actual: u64 = fragments.iter().map(|f| f.chunk.size()).sum();
    if actual != record.length {
        // A zero-length gather for a non-empty file means the first fragment is missing.
        if fragments.is_empty() {
            return Err(IntegrityError::MissingSequence {
                file: record.id.clone(),
                expected: 0,
                found: None,
            });
        }
        return Err(IntegrityError::LengthMismatch {
            file: record.id.clone(),
            expected: record.length,
            actual,
        });
    }

    let mut buffer = BytesMut::with_capacity(actual as usize);
    let mut hasher = Md5Checksum::hasher();
    for fragment in &fragments {
        hasher.update(&fragment.chunk.data);
        buffer.extend_from_slice(&fragment.chunk.data);
    }

    let checksum = hasher.finalize();
    if checksum != record.md5 {
        return Err(IntegrityError::ChecksumMismatch {
            file: record.id.clone(),
            expected: record.md5,
            actual: checksum,
        });
    }

    Ok(buffer.freeze())
}
