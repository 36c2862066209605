//! Response interpretation.

use campus_domain::ResponseSpec;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Fields checked, in order, for a server-provided error message.
const MESSAGE_FIELDS: [&str; 3] = ["message", "error_description", "error"];

/// Maps a final (non-retried) response to the caller's result.
///
/// - Non-JSON: a status below 400 succeeds with `Value::Null`, an error
///   status becomes `ApiError::Http`.
/// - JSON error status: `ApiError::Http` with the server message, falling
///   back to the raw body when it does not parse.
/// - JSON success: the parsed body, or `Value::Null` for an empty body.
///
/// # Errors
/// Returns `Http` for error statuses and `Decode` for a success body that is
/// not valid JSON.
pub fn interpret(response: &ResponseSpec) -> ApiResult<Value> {
    let is_error = response.status.is_error();

    if !response.is_json() {
        return if is_error {
            Err(http_error(response))
        } else {
            Ok(Value::Null)
        };
    }

    if is_error {
        return Err(http_error(response));
    }

    if response.is_body_blank() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode {
        message: format!("HTTP {}: {e}", response.status.as_u16()),
    })
}

/// Builds `ApiError::Http` with the best available message.
pub(crate) fn http_error(response: &ResponseSpec) -> ApiError {
    ApiError::Http {
        status: response.status.as_u16(),
        message: error_message(response),
    }
}

fn error_message(response: &ResponseSpec) -> String {
    if response.is_json()
        && let Ok(body) = serde_json::from_slice::<Value>(&response.body)
        && let Some(message) = MESSAGE_FIELDS
            .iter()
            .find_map(|field| body.get(field).and_then(Value::as_str))
    {
        return message.to_string();
    }

    let text = response.body_text();
    let text = text.trim();
    if text.is_empty() {
        response.status.reason_phrase().to_string()
    } else {
        text.to_string()
    }
}
