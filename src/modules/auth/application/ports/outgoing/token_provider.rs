use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a session token issued after QR login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token is not yet valid")]
    TokenNotYetValid,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Malformed token")]
    MalformedToken,
    #[error("Invalid token type, expected: {0}")]
    InvalidTokenType(String),
    #[error("Token encoding error: {0}")]
    EncodingError(String),
}

pub trait TokenProvider: Send + Sync {
    /// Issues a signed, time-limited session token for the given guest.
    fn issue_session_token(&self, user_id: Uuid) -> Result<String, TokenError>;

    /// Verifies signature, expiry and type, returning the decoded claims.
    fn verify_session_token(&self, token: &str) -> Result<SessionClaims, TokenError>;
}
