//! Chunk store backends.

pub mod postgres;
pub mod sqlite;
