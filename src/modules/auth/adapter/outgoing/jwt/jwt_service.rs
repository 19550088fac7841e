use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use std::fmt;
use tracing;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::token_provider::{
    SessionClaims, TokenError, TokenProvider,
};

use super::jwt_config::SessionConfig;

const SESSION_TOKEN_TYPE: &str = "session";

#[derive(Clone)]
pub struct JwtSessionService {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for JwtSessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSessionService")
            .field("config", &"SessionConfig")
            .finish()
    }
}

impl JwtSessionService {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl TokenProvider for JwtSessionService {
    fn issue_session_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.config.session_expiry);

        let claims = SessionClaims {
            sub: user_id,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingError(e.to_string()))
    }

    fn verify_session_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        validation.validate_nbf = true;

        let decoded =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;

                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token verification failed: Token expired");
                        TokenError::TokenExpired
                    }
                    ErrorKind::ImmatureSignature => {
                        tracing::warn!("Token verification failed: Token not yet valid");
                        TokenError::TokenNotYetValid
                    }
                    ErrorKind::InvalidSignature => {
                        tracing::error!("Security alert: Invalid token signature detected");
                        TokenError::InvalidSignature
                    }
                    ErrorKind::InvalidToken | ErrorKind::InvalidAlgorithm => {
                        tracing::error!("Security alert: Malformed or invalid algorithm token");
                        TokenError::MalformedToken
                    }
                    ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                        tracing::warn!("Token verification failed: Malformed token");
                        TokenError::MalformedToken
                    }
                    _ => {
                        tracing::warn!("Token verification failed: Unknown error");
                        TokenError::MalformedToken
                    }
                }
            })?;

        let claims = decoded.claims;

        if claims.token_type != SESSION_TOKEN_TYPE {
            tracing::warn!(
                "Token type mismatch: expected '{}', got '{}'",
                SESSION_TOKEN_TYPE,
                claims.token_type
            );
            return Err(TokenError::InvalidTokenType(
                SESSION_TOKEN_TYPE.to_string(),
            ));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtSessionService {
        let config = SessionConfig {
            secret_key: std::env::var("TEST_SESSION_SECRET")
                .unwrap_or_else(|_| "FAKE_SESSION_SECRET_DO_NOT_USE_32B!!".to_string()),
            session_expiry: 7200,
        };
        JwtSessionService::new(config)
    }

    #[test]
    fn test_issue_and_verify_session_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service
            .issue_session_token(user_id)
            .expect("Token should be issued");

        let claims = service.verify_session_token(&token).unwrap();
        assert_eq!(claims.sub, user_id, "User ID should match");
        assert_eq!(claims.token_type, "session");
    }

    #[test]
    fn test_invalid_token_verification() {
        let service = create_test_service();

        let result = service.verify_session_token("invalid.jwt.token");

        assert!(result.is_err(), "Invalid token should fail verification");
        assert!(matches!(result.unwrap_err(), TokenError::MalformedToken));
    }

    #[test]
    fn test_expired_token() {
        let config = SessionConfig {
            secret_key: "FAKE_SESSION_SECRET_DO_NOT_USE_32B!!".to_string(),
            session_expiry: -35, // already expired, beyond leeway
        };
        let service = JwtSessionService::new(config);
        let user_id = Uuid::new_v4();

        let token = service.issue_session_token(user_id).unwrap();
        let result = service.verify_session_token(&token);

        assert!(result.is_err(), "Expired token should be invalid");
        assert!(matches!(result.unwrap_err(), TokenError::TokenExpired));
    }

    #[test]
    fn test_invalid_signature() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue_session_token(user_id).unwrap();

        let different_config = SessionConfig {
            secret_key: format!("{}_DIFFERENT", service.config.secret_key),
            session_expiry: 7200,
        };
        let different_service = JwtSessionService::new(different_config);

        let result = different_service.verify_session_token(&token);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_token_fails() {
        let service = create_test_service();
        let mut token = service.issue_session_token(Uuid::new_v4()).unwrap();
        token.push('x');

        assert!(service.verify_session_token(&token).is_err());
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        // Forge a structurally valid token with a foreign token_type
        let service = create_test_service();
        let claims = SessionClaims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
            nbf: Utc::now().timestamp(),
            token_type: "refresh".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(service.config.secret_key.as_bytes()),
        )
        .unwrap();

        let result = service.verify_session_token(&token);
        assert!(matches!(
            result.unwrap_err(),
            TokenError::InvalidTokenType(expected) if expected == "session"
        ));
    }

    #[test]
    fn test_token_expiry_is_in_future() {
        let service = create_test_service();
        let token = service.issue_session_token(Uuid::new_v4()).unwrap();
        let claims = service.verify_session_token(&token).unwrap();

        let now = Utc::now().timestamp();
        assert!(claims.exp > now, "Expiry should be in the future");
        assert!(claims.iat <= now, "Issued at should be now or in the past");
        assert!(claims.nbf <= now, "Not before should be now or in the past");
    }

    #[test]
    fn test_token_error_display() {
        assert_eq!(format!("{}", TokenError::TokenExpired), "Token has expired");
        assert_eq!(
            format!("{}", TokenError::InvalidSignature),
            "Invalid token signature"
        );
        assert_eq!(format!("{}", TokenError::MalformedToken), "Malformed token");
        assert_eq!(
            format!("{}", TokenError::InvalidTokenType("session".to_string())),
            "Invalid token type, expected: session"
        );
    }

    #[test]
    fn test_service_clone_produces_valid_tokens() {
        let service = create_test_service();
        let cloned = service.clone();

        let user_id = Uuid::new_v4();
        let token = cloned.issue_session_token(user_id).unwrap();
        assert!(service.verify_session_token(&token).is_ok());
    }
}
