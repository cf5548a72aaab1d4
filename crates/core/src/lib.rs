//! # Stitch Core
//!
//! Pure client logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Sequence number generation
//! - Port interfaces (traits) for the HTTP transport and wire encoder
//! - The request/response contract of a single API call
//! - Batching of record streams into push requests
//!
//! ## Architecture Principles
//! - Only depends on `stitch-domain`
//! - No HTTP, TLS or serialization-format code
//! - All external collaborators via traits

pub mod client;
pub mod ports;
pub mod pusher;
pub mod sequence;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ApiClient, ApiClientBuilder};
pub use ports::{RequestEncoder, Transport, TransportRequest, TransportResponse};
pub use pusher::BatchPusher;
pub use sequence::{Clock, MockClock, SequenceGenerator, SystemClock};
