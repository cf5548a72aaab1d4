//! Wire encoders for request bodies

pub mod json;
pub mod transit;

use std::sync::Arc;

use stitch_core::ports::RequestEncoder;
use stitch_domain::WireFormat;

pub use json::JsonEncoder;
pub use transit::TransitJsonEncoder;

/// Encoder implementing the configured wire format.
pub fn encoder_for(format: WireFormat) -> Arc<dyn RequestEncoder> {
    match format {
        WireFormat::TransitJson => Arc::new(TransitJsonEncoder),
        WireFormat::Json => Arc::new(JsonEncoder),
    }
}
