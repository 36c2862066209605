//! Header names and value checks.

/// `Content-Type`
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Accept`
pub const ACCEPT: &str = "Accept";
/// `Authorization`
pub const AUTHORIZATION: &str = "Authorization";
/// Signed-in user id, required by institution-scoped endpoints.
pub const X_USER_ID: &str = "X-User-Id";
/// Comma-separated roles, required by institution-scoped endpoints.
pub const X_USER_ROLES: &str = "X-User-Roles";
/// Institution scope, required by institution-scoped endpoints.
pub const X_INSTITUTION_ID: &str = "X-Institution-Id";

/// Media type sent and accepted by every call.
pub const APPLICATION_JSON: &str = "application/json";

/// Returns true if `name` is a non-empty RFC 9110 token.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Returns true if `value` has no control characters other than tab.
#[must_use]
pub fn is_valid_value(value: &str) -> bool {
    value.bytes().all(|b| b == b'\t' || (b >= 0x20 && b != 0x7f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names() {
        assert!(is_valid_name(X_INSTITUTION_ID));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Bad Header"));
        assert!(!is_valid_name("Bad:Header"));
    }

    #[test]
    fn test_header_values() {
        assert!(is_valid_value("ADMIN,DIRECTOR"));
        assert!(is_valid_value("a\tb"));
        assert!(!is_valid_value("a\nb"));
    }
}
