//! JSON helpers for the presentation-layer boundary.
//!
//! The core hands grids and summaries to the presentation layer as
//! plain serde payloads; these helpers pin the encoding without
//! mandating a wire protocol.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::PricingError;

/// Serializes a boundary payload to pretty-printed JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, PricingError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PricingError::Serialization(format!("json encode failed: {e}")))
}

/// Deserializes a boundary payload from JSON.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, PricingError> {
    serde_json::from_str(json)
        .map_err(|e| PricingError::Serialization(format!("json decode failed: {e}")))
}
