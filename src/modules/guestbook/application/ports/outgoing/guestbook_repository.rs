use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::guestbook::application::domain::message::GuestbookMessage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuestbookRepositoryError {
    #[error("Message not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Debug, Clone)]
pub struct NewGuestbookMessage {
    pub user_id: Uuid,
    pub author_name: String,
    pub message: String,
}

#[async_trait]
pub trait GuestbookRepository: Send + Sync {
    async fn insert(
        &self,
        message: NewGuestbookMessage,
    ) -> Result<GuestbookMessage, GuestbookRepositoryError>;

    /// Newest first. Only approved and visible messages unless
    /// `include_hidden` is set.
    async fn list(
        &self,
        include_hidden: bool,
    ) -> Result<Vec<GuestbookMessage>, GuestbookRepositoryError>;

    async fn set_moderation(
        &self,
        message_id: Uuid,
        approved: bool,
        visible: bool,
    ) -> Result<GuestbookMessage, GuestbookRepositoryError>;
}
