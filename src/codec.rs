//! Response Codec
//!
//! JSON mapping between `CachedResource` and the bytes carried over the
//! network and held in the cache. Decoding is all-or-nothing.

use crate::error::FormatError;
use crate::models::CachedResource;

/// Media type of encoded resources.
pub const CONTENT_TYPE: &str = "application/json";

pub fn encode(resource: &CachedResource) -> Result<Vec<u8>, FormatError> {
    Ok(serde_json::to_vec(resource)?)
}

/// Parses a payload of the form `{"items": ["..", ..]}`.
///
/// Missing `items`, non-string items or non-JSON input are all rejected;
/// unknown sibling fields are ignored.
pub fn decode(bytes: &[u8]) -> Result<CachedResource, FormatError> {
    Ok(serde_json::from_slice(bytes)?)
}
