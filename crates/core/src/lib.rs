//! Core domain types shared across the shardfs crates.
//!
//! This crate defines the canonical data model:
//! - File metadata records and their identifiers
//! - Chunk (fragment) records with sequence numbers
//! - MD5 checksums and SHA-1 content keys
//! - Typed lookup queries
//! - Configuration for the metadata store and chunk shards
//! - Splitting of embedded SQL schema scripts

pub mod chunk;
pub mod config;
pub mod error;
pub mod file;
pub mod hash;
pub mod query;
pub mod sql;

pub use chunk::{ChunkId, ChunkRecord};
pub use error::{Error, Result};
pub use file::{FileId, FileRecord};
pub use hash::{Md5Checksum, Md5Hasher, Sha1Digest};
pub use query::FileQuery;
