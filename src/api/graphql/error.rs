use async_graphql::{Error, ErrorExtensions};

use crate::auth::application::services::SessionError;

/// Error codes surfaced in the `extensions.code` field, mirroring the
/// Apollo convention most GraphQL clients already understand.
pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const FORBIDDEN: &str = "FORBIDDEN";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

fn with_code(message: impl Into<String>, code: &'static str) -> Error {
    Error::new(message.into()).extend_with(|_, e| e.set("code", code))
}

pub fn unauthenticated(message: impl Into<String>) -> Error {
    with_code(message, UNAUTHENTICATED)
}

pub fn bad_user_input(message: impl Into<String>) -> Error {
    with_code(message, BAD_USER_INPUT)
}

pub fn forbidden(message: impl Into<String>) -> Error {
    with_code(message, FORBIDDEN)
}

pub fn not_found(message: impl Into<String>) -> Error {
    with_code(message, NOT_FOUND)
}

/// Internal failures carry a generic message; details stay in the logs.
pub fn internal() -> Error {
    with_code("An unexpected error occurred", INTERNAL_SERVER_ERROR)
}

pub fn from_session_error(e: SessionError) -> Error {
    match e {
        SessionError::Unauthenticated => unauthenticated(e.to_string()),
        SessionError::Forbidden => forbidden(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(error: &Error) -> String {
        let server_error = error.clone().into_server_error(async_graphql::Pos::default());
        let extensions = server_error.extensions.expect("extensions set");
        format!("{:?}", extensions.get("code").expect("code set"))
    }

    #[test]
    fn helpers_attach_their_codes() {
        assert!(code_of(&unauthenticated("x")).contains("UNAUTHENTICATED"));
        assert!(code_of(&bad_user_input("x")).contains("BAD_USER_INPUT"));
        assert!(code_of(&forbidden("x")).contains("FORBIDDEN"));
        assert!(code_of(&not_found("x")).contains("NOT_FOUND"));
        assert!(code_of(&internal()).contains("INTERNAL_SERVER_ERROR"));
    }

    #[test]
    fn internal_error_hides_details() {
        assert_eq!(internal().message, "An unexpected error occurred");
    }

    #[test]
    fn session_errors_map_to_auth_codes() {
        let unauth = from_session_error(SessionError::Unauthenticated);
        assert_eq!(unauth.message, "Authentication required");
        assert!(code_of(&unauth).contains("UNAUTHENTICATED"));

        let forbidden_err = from_session_error(SessionError::Forbidden);
        assert_eq!(forbidden_err.message, "Admin privileges required");
        assert!(code_of(&forbidden_err).contains("FORBIDDEN"));
    }
}
