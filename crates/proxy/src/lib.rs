//! Scatter-gather file access over sharded chunk stores.
//!
//! A file's content is split into numbered fragments spread over any number
//! of chunk shards. Its metadata record (name, length, MD5) lives in a single
//! metadata store. This crate locates a file, gathers its fragments from
//! every shard, and returns the reassembled content only once it verifies
//! against the record. Deletes are broadcast the same way.

pub mod deleter;
pub mod error;
pub mod proxy;
pub mod reader;
pub mod reconstructor;

pub use deleter::{DeleteOutcome, Deleter};
pub use error::{DeleteReport, IntegrityError, ProxyError, ProxyResult, ShardDeletion};
pub use proxy::ShardedProxy;
pub use reader::FileReader;
pub use reconstructor::{Reconstructor, ShardFragment, assemble};
