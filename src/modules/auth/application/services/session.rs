use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::application::domain::entities::Guest;
use crate::auth::application::ports::outgoing::{TokenProvider, UserQuery};

/// Per-request authentication state attached to the GraphQL context.
///
/// An anonymous session is not an error: unauthenticated operations (login,
/// introspection) must still succeed. Guards on protected resolvers go
/// through [`Session::require_auth`] / [`Session::require_admin`].
#[derive(Debug, Clone)]
pub struct Session {
    user: Option<Guest>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Admin privileges required")]
    Forbidden,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: Guest) -> Self {
        Self { user: Some(user) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&Guest> {
        self.user.as_ref()
    }

    pub fn require_auth(&self) -> Result<&Guest, SessionError> {
        self.user.as_ref().ok_or(SessionError::Unauthenticated)
    }

    pub fn require_admin(&self) -> Result<&Guest, SessionError> {
        let user = self.require_auth()?;
        if !user.is_admin {
            return Err(SessionError::Forbidden);
        }
        Ok(user)
    }
}

/// Resolves a bearer credential into a [`Session`].
///
/// Every verification failure is swallowed to an anonymous session rather
/// than surfaced: mixed clients (stale tokens, no token at all) must not see
/// hard errors from context construction. Protected resolvers reject the
/// anonymous session themselves.
#[derive(Clone)]
pub struct SessionAuthenticator {
    tokens: Arc<dyn TokenProvider + Send + Sync>,
    users: Arc<dyn UserQuery + Send + Sync>,
}

impl SessionAuthenticator {
    pub fn new(
        tokens: Arc<dyn TokenProvider + Send + Sync>,
        users: Arc<dyn UserQuery + Send + Sync>,
    ) -> Self {
        Self { tokens, users }
    }

    pub async fn authenticate(&self, bearer: Option<&str>) -> Session {
        let Some(token) = bearer else {
            return Session::anonymous();
        };

        let claims = match self.tokens.verify_session_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Session token rejected: {e}");
                return Session::anonymous();
            }
        };

        match self.users.find_by_id(claims.sub).await {
            Ok(Some(user)) => Session::authenticated(user),
            Ok(None) => {
                debug!(user_id = %claims.sub, "Session subject no longer exists");
                Session::anonymous()
            }
            Err(e) => {
                warn!("Guest lookup failed during session resolution: {e}");
                Session::anonymous()
            }
        }
    }
}
