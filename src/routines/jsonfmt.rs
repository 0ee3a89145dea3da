//! JSON re-serialisation: minify and beautify.
//!
//! Both directions parse to a value tree and re-serialise, touching only
//! whitespace. Key order survives (`serde_json`'s `preserve_order`
//! feature), which is what makes the round-trip law hold: beautify∘minify
//! and minify∘beautify normalise to the same bytes as the single-step
//! equivalents.

use crate::error::ConvertError;
use serde_json::Value;

fn parse(bytes: &[u8]) -> Result<Value, ConvertError> {
    serde_json::from_slice(bytes).map_err(|e| ConvertError::DecodeFailure {
        what: "json",
        detail: e.to_string(),
    })
}

/// Re-serialise with no inserted whitespace.
pub fn minify(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let value = parse(bytes)?;
    serde_json::to_vec(&value).map_err(|e| ConvertError::Internal(format!("json: {e}")))
}

/// Re-serialise with 2-space indentation.
pub fn beautify(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let value = parse(bytes)?;
    serde_json::to_vec_pretty(&value).map_err(|e| ConvertError::Internal(format!("json: {e}")))
}
