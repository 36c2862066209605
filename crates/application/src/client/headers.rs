//! Header assembly from the current session.

use campus_domain::request::headers;
use campus_domain::{ApiRequest, DomainError, DomainResult, Session};

/// Builds the outgoing headers for `request` from `session`.
///
/// `Authorization` is sent only when a non-empty access token is present, and
/// each context header only when its session field is set. Caller headers
/// follow the managed ones.
#[must_use]
pub fn assemble_headers(session: &Session, request: &ApiRequest) -> Vec<(String, String)> {
    let mut out = vec![
        (
            headers::CONTENT_TYPE.to_string(),
            headers::APPLICATION_JSON.to_string(),
        ),
        (
            headers::ACCEPT.to_string(),
            headers::APPLICATION_JSON.to_string(),
        ),
    ];

    if let Some(token) = session.bearer_token() {
        out.push((headers::AUTHORIZATION.to_string(), format!("Bearer {token}")));
    }
    if let Some(user_id) = &session.user_id {
        out.push((headers::X_USER_ID.to_string(), user_id.clone()));
    }
    if let Some(roles) = &session.roles {
        out.push((headers::X_USER_ROLES.to_string(), roles.join(",")));
    }
    if let Some(institution_id) = &session.institution_id {
        out.push((headers::X_INSTITUTION_ID.to_string(), institution_id.clone()));
    }

    out.extend(request.headers.iter().cloned());
    out
}

/// Rejects an institution-scoped request when the session lacks the fields
/// its headers are built from.
///
/// # Errors
/// Returns `DomainError::MissingSessionContext` naming the first missing field.
pub fn require_context(session: &Session, request: &ApiRequest) -> DomainResult<()> {
    if !request.institution_scoped {
        return Ok(());
    }

    let missing = if session.user_id.is_none() {
        Some("user_id")
    } else if session.roles.is_none() {
        Some("user_roles")
    } else if session.institution_id.is_none() {
        Some("institution_id")
    } else {
        None
    };

    missing.map_or(Ok(()), |field| {
        Err(DomainError::MissingSessionContext(field.to_string()))
    })
}
