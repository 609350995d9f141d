//! Delete broadcast across all chunk shards.

use crate::error::{DeleteReport, ProxyError, ProxyResult, ShardDeletion};
use futures::future::join_all;
use shardfs_core::{FileId, FileQuery, FileRecord};
use shardfs_metadata::MetadataStore;
use shardfs_storage::ChunkStore;
use std::sync::Arc;

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No file record matched. Nothing was touched.
    NotFound,
    /// The record and every fragment were removed.
    Deleted(DeleteReport),
}

/// Removes a file's fragments from every shard, then its metadata record.
///
/// The record is removed only after every shard has confirmed. On partial
/// failure the record stays, so the remaining fragments can still be found
/// and the delete retried.
pub struct Deleter<'a> {
    metadata: &'a dyn MetadataStore,
    shards: &'a [Arc<dyn ChunkStore>],
}

impl<'a> Deleter<'a> {
    pub fn new(metadata: &'a dyn MetadataStore, shards: &'a [Arc<dyn ChunkStore>]) -> Self {
        Self { metadata, shards }
    }

    /// Delete the file matching `query` from every shard and the metadata store.
    pub async fn delete(&self, query: &FileQuery) -> ProxyResult<DeleteOutcome> {
        let Some(record) = self.metadata.find_one(query).await? else {
            tracing::debug!(query = %query, "delete: no matching file record");
            return Ok(DeleteOutcome::NotFound);
        };

        let all: Vec<usize> = (0..self.shards.len()).collect();
        self.delete_on_shards(&record, &all)
            .await
            .map(DeleteOutcome::Deleted)
    }

    /// Broadcast the fragment delete to the given shards, then remove the record.
    ///
    /// Used directly to retry the shards named by a previous
    /// `ProxyError::PartialDelete` report.
    pub async fn delete_on_shards(
        &self,
        record: &FileRecord,
        shards: &[usize],
    ) -> ProxyResult<DeleteReport> {
        if let Some(bad) = shards.iter().find(|&&i| i >= self.shards.len()) {
            return Err(ProxyError::Validation(shardfs_core::Error::InvalidQuery(
                format!("shard index {bad} out of range ({} shards)", self.shards.len()),
            )));
        }

        let report = self.broadcast(&record.id, shards).await;
        if !report.is_complete() {
            tracing::warn!(
                file = %record.id,
                failed = ?report.failed_shards(),
                "fragment delete incomplete; file record kept"
            );
            return Err(ProxyError::PartialDelete(report));
        }

        let removed = match self.metadata.delete_file(&record.id).await {
            Ok(removed) => removed,
            Err(source) => {
                tracing::error!(
                    file = %record.id,
                    fragments = report.fragments_removed(),
                    error = %source,
                    "fragments removed but file record delete failed"
                );
                return Err(ProxyError::RecordDelete { report, source });
            }
        };
        tracing::info!(
            file = %record.id,
            fragments = report.fragments_removed(),
            record_removed = removed,
            "file deleted"
        );
        Ok(report)
    }

    /// Delete fragments on the given shards and wait for every attempt.
    pub(crate) async fn broadcast(&self, file: &FileId, shards: &[usize]) -> DeleteReport {
        let attempts = shards.iter().map(|&shard| {
            let store = &self.shards[shard];
            async move {
                let result = store
                    .delete_chunks(file)
                    .await
                    .map_err(|e| e.to_string());
                if let Err(message) = &result {
                    tracing::warn!(shard, store = store.label(), error = %message, "fragment delete failed");
                }
                ShardDeletion {
                    shard,
                    store: store.label().to_string(),
                    result,
                }
            }
        });

        DeleteReport {
            file: file.clone(),
            shards: join_all(attempts).await,
        }
    }
}
