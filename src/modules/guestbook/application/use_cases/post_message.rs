use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::auth::application::domain::entities::Guest;
use crate::modules::guestbook::application::domain::message::{
    GuestbookMessage, MessageBody, MessageValidationError,
};
use crate::modules::guestbook::application::ports::outgoing::{
    GuestbookRepository, NewGuestbookMessage,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostMessageError {
    #[error(transparent)]
    Validation(#[from] MessageValidationError),
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IPostMessageUseCase: Send + Sync {
    async fn execute(&self, author: &Guest, message: &str)
        -> Result<GuestbookMessage, PostMessageError>;
}

pub struct PostMessageUseCase<G: GuestbookRepository> {
    guestbook: Arc<G>,
}

impl<G: GuestbookRepository> PostMessageUseCase<G> {
    pub fn new(guestbook: Arc<G>) -> Self {
        Self { guestbook }
    }
}

#[async_trait]
impl<G: GuestbookRepository> IPostMessageUseCase for PostMessageUseCase<G> {
    async fn execute(
        &self,
        author: &Guest,
        message: &str,
    ) -> Result<GuestbookMessage, PostMessageError> {
        let body = MessageBody::new(message)?;

        self.guestbook
            .insert(NewGuestbookMessage {
                user_id: author.id,
                author_name: author.full_name.clone(),
                message: body.as_str().to_string(),
            })
            .await
            .map_err(|e| PostMessageError::Repository(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::guestbook::application::ports::outgoing::GuestbookRepositoryError;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct StubGuestbook {
        inserted: Mutex<Vec<NewGuestbookMessage>>,
    }

    #[async_trait]
    impl GuestbookRepository for StubGuestbook {
        async fn insert(
            &self,
            message: NewGuestbookMessage,
        ) -> Result<GuestbookMessage, GuestbookRepositoryError> {
            self.inserted.lock().unwrap().push(message.clone());
            let now = Utc::now();
            Ok(GuestbookMessage {
                id: Uuid::new_v4(),
                user_id: message.user_id,
                author_name: message.author_name,
                message: message.message,
                is_approved: false,
                is_visible: true,
                created_at: now,
                updated_at: now,
            })
        }

        async fn list(
            &self,
            _include_hidden: bool,
        ) -> Result<Vec<GuestbookMessage>, GuestbookRepositoryError> {
            Ok(vec![])
        }

        async fn set_moderation(
            &self,
            _message_id: Uuid,
            _approved: bool,
            _visible: bool,
        ) -> Result<GuestbookMessage, GuestbookRepositoryError> {
            Err(GuestbookRepositoryError::NotFound)
        }
    }

    fn author() -> Guest {
        Guest {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            full_name: "Jane Doe".to_string(),
            is_invited: true,
            has_rsvped: true,
            is_admin: false,
            qr_token: "tok".to_string(),
            qr_alias: None,
            household_members: vec![],
            address_line: None,
            city: None,
            postal_code: None,
            country: None,
            personal_note: None,
            rsvp_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn stores_sanitized_message_with_author_name() {
        let repo = Arc::new(StubGuestbook {
            inserted: Mutex::new(vec![]),
        });
        let use_case = PostMessageUseCase::new(repo.clone());

        let posted = use_case
            .execute(&author(), "  <b>Congrats!</b>  ")
            .await
            .unwrap();

        assert_eq!(posted.message, "Congrats!");
        assert!(!posted.is_approved);
        assert!(posted.is_visible);
        let inserted = repo.inserted.lock().unwrap();
        assert_eq!(inserted[0].author_name, "Jane Doe");
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let repo = Arc::new(StubGuestbook {
            inserted: Mutex::new(vec![]),
        });
        let use_case = PostMessageUseCase::new(repo.clone());

        let err = use_case.execute(&author(), "   ").await.unwrap_err();

        assert!(matches!(err, PostMessageError::Validation(_)));
        assert!(repo.inserted.lock().unwrap().is_empty());
    }
}
