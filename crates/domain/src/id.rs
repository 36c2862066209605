//! Request correlation ids.

use uuid::Uuid;

/// Generates a time-ordered id for correlating the log lines of one logical call.
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::now_v7().to_string()
}
