pub mod cluster;
pub mod fixtures;
pub mod mocks;
pub mod sqlite;

#[allow(unused_imports)]
pub use cluster::Cluster;
#[allow(unused_imports)]
pub use fixtures::{file_record, seeded_bytes, sha1_key, split_fixed, split_sizes};
#[allow(unused_imports)]
pub use mocks::{MemoryChunkStore, MemoryMetadataStore};
