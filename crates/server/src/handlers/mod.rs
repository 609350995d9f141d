//! HTTP request handlers.

pub mod retrieval;
pub mod status;

pub use retrieval::*;
pub use status::*;
