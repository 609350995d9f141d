//! Handle to one located file.

use crate::deleter::Deleter;
use crate::error::{DeleteReport, ProxyResult};
use crate::proxy::ShardedProxy;
use crate::reconstructor::Reconstructor;
use bytes::Bytes;
use shardfs_core::FileRecord;

/// A file whose record has been found, bound to the proxy that found it.
pub struct FileReader<'a> {
    proxy: &'a ShardedProxy,
    record: FileRecord,
}

impl<'a> FileReader<'a> {
    pub(crate) fn new(proxy: &'a ShardedProxy, record: FileRecord) -> Self {
        Self { proxy, record }
    }

    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    /// Reassemble and verify the file's content.
    pub async fn read(&self) -> ProxyResult<Bytes> {
        Reconstructor::new(self.proxy.shards())
            .read(&self.record)
            .await
    }

    /// Remove this file's fragments from every shard. The record is left in place.
    pub async fn delete_fragments(&self) -> DeleteReport {
        let all: Vec<usize> = (0..self.proxy.shard_count()).collect();
        Deleter::new(self.proxy.metadata(), self.proxy.shards())
            .broadcast(&self.record.id, &all)
            .await
    }
}

impl std::fmt::Debug for FileReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileReader")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
