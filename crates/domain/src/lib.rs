//! # Stitch Domain
//!
//! Data model for the Stitch Import API client.
//!
//! This crate contains:
//! - Wire-level data types (Credentials, Record, Command)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - API constants (endpoints, accepted statuses, defaults)
//!
//! ## Architecture
//! - No dependencies on other Stitch crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
