//! Utils Module - Shared Helpers
//!
//! Constants shared across the crate and the process-wide model cache.

pub mod cache;
pub mod constants;

pub use cache::*;
pub use constants::*;
