//! Response decoding into the descriptor's declared type.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;
use crate::http::HttpResponse;

/// Decode `response.body` into `T`.
///
/// The body is parsed as JSON first, so a payload that is not JSON
/// (`Malformed`) is told apart from JSON of the wrong shape
/// (`UnexpectedShape`). Unknown fields are ignored. An empty body decodes as
/// `null`, which suits `()` and `Option<_>` targets.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, DecodeError> {
    let expected = type_name::<T>();

    let value: Value = if response.body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&response.body).map_err(|e| DecodeError::Malformed {
            expected,
            message: e.to_string(),
        })?
    };

    serde_json::from_value(value).map_err(|e| DecodeError::UnexpectedShape {
        expected,
        message: e.to_string(),
    })
}
