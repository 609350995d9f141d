pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{insert_chunk, open_shard, seeded_bytes};
