use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::guestbook::application::domain::message::GuestbookMessage;
use crate::modules::guestbook::application::ports::outgoing::{
    GuestbookRepository, GuestbookRepositoryError,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModerateMessageError {
    #[error("Message not found")]
    NotFound,
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IModerateMessageUseCase: Send + Sync {
    async fn execute(
        &self,
        message_id: Uuid,
        approved: bool,
        visible: bool,
    ) -> Result<GuestbookMessage, ModerateMessageError>;
}

pub struct ModerateMessageUseCase<G: GuestbookRepository> {
    guestbook: Arc<G>,
}

impl<G: GuestbookRepository> ModerateMessageUseCase<G> {
    pub fn new(guestbook: Arc<G>) -> Self {
        Self { guestbook }
    }
}

#[async_trait]
impl<G: GuestbookRepository> IModerateMessageUseCase for ModerateMessageUseCase<G> {
    async fn execute(
        &self,
        message_id: Uuid,
        approved: bool,
        visible: bool,
    ) -> Result<GuestbookMessage, ModerateMessageError> {
        self.guestbook
            .set_moderation(message_id, approved, visible)
            .await
            .map_err(|e| match e {
                GuestbookRepositoryError::NotFound => ModerateMessageError::NotFound,
                other => ModerateMessageError::Repository(other.to_string()),
            })
    }
}
