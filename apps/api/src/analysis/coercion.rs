//! JSON coercion — recovers a JSON value from a model reply that is almost JSON.
//!
//! 1. Parse the whole reply.
//! 2. Otherwise slice from the first `{` to the last `}` and parse that.
//!
//! Known limitation: the slice is by index, not a balanced-brace scan, so braces
//! in surrounding prose widen the slice and make it fail. With several brace
//! regions the slice spans all of them. The result is an untyped value; schema
//! conformance is checked separately by `AnalysisResult` decoding.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("no JSON object found")]
    NoJsonObject,

    #[error("unparseable JSON fragment")]
    UnparseableFragment,
}

pub fn coerce_json(raw: &str) -> Result<Value, CoercionError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }

    let (Some(first), Some(last)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(CoercionError::NoJsonObject);
    };
    if last < first {
        return Err(CoercionError::UnparseableFragment);
    }

    // Both indices sit on single-byte ASCII braces, so the slice is on char boundaries.
    serde_json::from_str::<Value>(&raw[first..=last])
        .map_err(|_| CoercionError::UnparseableFragment)
}
