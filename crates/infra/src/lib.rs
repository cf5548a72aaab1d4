//! # Stitch Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - HTTP transport (reqwest)
//! - Wire encoders (Transit+JSON, plain JSON)
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `stitch-core`
//! - Contains all "impure" code (network I/O, filesystem, environment)

pub mod bootstrap;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use bootstrap::{client_from_config, pusher_from_config};
pub use encoding::{encoder_for, JsonEncoder, TransitJsonEncoder};
pub use errors::InfraError;
pub use http::{HttpTransport, HttpTransportBuilder};
pub use observability::init_tracing;
