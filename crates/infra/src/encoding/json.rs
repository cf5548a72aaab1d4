//! Plain JSON request bodies (`application/json`).

use serde_json::Value;
use stitch_core::ports::RequestEncoder;
use stitch_domain::constants::JSON_CONTENT_TYPE;
use stitch_domain::{Result, StitchError};

use crate::errors::InfraError;

/// Encodes commands as a plain JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl RequestEncoder for JsonEncoder {
    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn encode(&self, commands: &[Value]) -> Result<Vec<u8>> {
        serde_json::to_vec(commands).map_err(|err| StitchError::from(InfraError::from(err)))
    }
}
