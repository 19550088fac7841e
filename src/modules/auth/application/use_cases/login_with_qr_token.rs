use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::auth::application::domain::entities::Guest;
use crate::auth::application::ports::outgoing::{TokenProvider, UserQuery};

/// Result of a successful QR login: a session token plus the guest it
/// belongs to, so the client can render the invitation immediately.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: Guest,
}

#[derive(Debug, thiserror::Error)]
pub enum QrLoginError {
    #[error("Invalid QR code")]
    UnknownToken,
    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
    #[error("query error: {0}")]
    Query(String),
}

#[async_trait]
pub trait ILoginWithQrTokenUseCase: Send + Sync {
    async fn execute(&self, qr_token: &str) -> Result<AuthPayload, QrLoginError>;
}

/// Exchanges a guest's QR credential for a session token.
///
/// The canonical token is matched exactly (case-sensitive); when that misses,
/// the input is normalized and tried against the human-readable alias.
/// Issuance is stateless: nothing on the guest row changes.
#[derive(Clone)]
pub struct LoginWithQrTokenUseCase<Q>
where
    Q: UserQuery,
{
    query: Q,
    tokens: Arc<dyn TokenProvider + Send + Sync>,
}

impl<Q> LoginWithQrTokenUseCase<Q>
where
    Q: UserQuery,
{
    pub fn new(query: Q, tokens: Arc<dyn TokenProvider + Send + Sync>) -> Self {
        Self { query, tokens }
    }

    async fn resolve_guest(&self, qr_token: &str) -> Result<Option<Guest>, QrLoginError> {
        if let Some(guest) = self
            .query
            .find_by_qr_token(qr_token)
            .await
            .map_err(|e| QrLoginError::Query(e.to_string()))?
        {
            return Ok(Some(guest));
        }

        let alias = qr_token.trim().to_lowercase();
        if alias.is_empty() {
            return Ok(None);
        }

        self.query
            .find_by_qr_alias(&alias)
            .await
            .map_err(|e| QrLoginError::Query(e.to_string()))
    }
}

#[async_trait]
impl<Q> ILoginWithQrTokenUseCase for LoginWithQrTokenUseCase<Q>
where
    Q: UserQuery,
{
    async fn execute(&self, qr_token: &str) -> Result<AuthPayload, QrLoginError> {
        let guest = self
            .resolve_guest(qr_token)
            .await?
            .ok_or(QrLoginError::UnknownToken)?;

        let token = self
            .tokens
            .issue_session_token(guest.id)
            .map_err(|e| QrLoginError::TokenGeneration(e.to_string()))?;

        info!(user_id = %guest.id, "Guest logged in via QR token");

        Ok(AuthPayload { token, user: guest })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::ports::outgoing::{
        SessionClaims, TokenError, UserStoreError,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_guest(qr_token: &str, qr_alias: Option<&str>) -> Guest {
        let now = Utc::now();
        Guest {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            full_name: "Jane Doe".to_string(),
            is_invited: true,
            has_rsvped: false,
            is_admin: false,
            qr_token: qr_token.to_string(),
            qr_alias: qr_alias.map(|a| a.to_string()),
            household_members: vec![],
            address_line: None,
            city: None,
            postal_code: None,
            country: None,
            personal_note: None,
            rsvp_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[derive(Default)]
    struct MockUserQuery {
        guest: Option<Guest>,
        should_fail: bool,
    }

    #[async_trait]
    impl UserQuery for MockUserQuery {
        async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<Guest>, UserStoreError> {
            Ok(None)
        }

        async fn find_by_qr_token(&self, qr_token: &str) -> Result<Option<Guest>, UserStoreError> {
            if self.should_fail {
                return Err(UserStoreError::Database("db down".to_string()));
            }
            Ok(self
                .guest
                .clone()
                .filter(|g| g.qr_token == qr_token))
        }

        async fn find_by_qr_alias(&self, qr_alias: &str) -> Result<Option<Guest>, UserStoreError> {
            if self.should_fail {
                return Err(UserStoreError::Database("db down".to_string()));
            }
            Ok(self
                .guest
                .clone()
                .filter(|g| g.qr_alias.as_deref() == Some(qr_alias)))
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<Guest>, UserStoreError> {
            Ok(None)
        }
    }

    struct StubTokens {
        fail: bool,
    }

    impl TokenProvider for StubTokens {
        fn issue_session_token(&self, _user_id: Uuid) -> Result<String, TokenError> {
            if self.fail {
                return Err(TokenError::EncodingError("boom".to_string()));
            }
            Ok("signed-session-token".to_string())
        }

        fn verify_session_token(&self, _token: &str) -> Result<SessionClaims, TokenError> {
            Err(TokenError::MalformedToken)
        }
    }

    fn use_case(
        guest: Option<Guest>,
        query_fails: bool,
        tokens_fail: bool,
    ) -> LoginWithQrTokenUseCase<MockUserQuery> {
        LoginWithQrTokenUseCase::new(
            MockUserQuery {
                guest,
                should_fail: query_fails,
            },
            Arc::new(StubTokens { fail: tokens_fail }),
        )
    }

    #[tokio::test]
    async fn login_with_exact_token_succeeds() {
        let guest = sample_guest("AbC123", None);
        let uc = use_case(Some(guest.clone()), false, false);

        let payload = uc.execute("AbC123").await.unwrap();
        assert_eq!(payload.token, "signed-session-token");
        assert_eq!(payload.user.id, guest.id);
    }

    #[tokio::test]
    async fn token_match_is_case_sensitive() {
        let uc = use_case(Some(sample_guest("AbC123", None)), false, false);

        let result = uc.execute("abc123").await;
        assert!(matches!(result, Err(QrLoginError::UnknownToken)));
    }

    #[tokio::test]
    async fn alias_match_is_normalized() {
        let guest = sample_guest("opaque-token", Some("jane-doe"));
        let uc = use_case(Some(guest.clone()), false, false);

        let payload = uc.execute("  Jane-DOE  ").await.unwrap();
        assert_eq!(payload.user.id, guest.id);
    }

    #[tokio::test]
    async fn unknown_credential_fails() {
        let uc = use_case(Some(sample_guest("real", Some("alias"))), false, false);

        let result = uc.execute("no-such-token").await;
        assert!(matches!(result, Err(QrLoginError::UnknownToken)));
    }

    #[tokio::test]
    async fn empty_input_fails_without_alias_lookup() {
        let uc = use_case(None, false, false);

        let result = uc.execute("   ").await;
        assert!(matches!(result, Err(QrLoginError::UnknownToken)));
    }

    #[tokio::test]
    async fn query_failure_is_surfaced() {
        let uc = use_case(None, true, false);

        let result = uc.execute("anything").await;
        assert!(matches!(result, Err(QrLoginError::Query(_))));
    }

    #[tokio::test]
    async fn token_generation_failure_is_surfaced() {
        let uc = use_case(Some(sample_guest("tok", None)), false, true);

        let result = uc.execute("tok").await;
        assert!(matches!(result, Err(QrLoginError::TokenGeneration(_))));
    }
}
