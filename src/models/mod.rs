//! Models Module - Data Structures & Configuration
//!
//! Patient record, risk verdict, error types and runtime configuration.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
