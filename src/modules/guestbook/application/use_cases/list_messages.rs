use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::guestbook::application::domain::message::GuestbookMessage;
use crate::modules::guestbook::application::ports::outgoing::GuestbookRepository;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListMessagesError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IListMessagesUseCase: Send + Sync {
    /// Published messages for everyone; admins may ask for the rest too.
    async fn execute(&self, include_hidden: bool)
        -> Result<Vec<GuestbookMessage>, ListMessagesError>;
}

pub struct ListMessagesUseCase<G: GuestbookRepository> {
    guestbook: Arc<G>,
}

impl<G: GuestbookRepository> ListMessagesUseCase<G> {
    pub fn new(guestbook: Arc<G>) -> Self {
        Self { guestbook }
    }
}

#[async_trait]
impl<G: GuestbookRepository> IListMessagesUseCase for ListMessagesUseCase<G> {
    async fn execute(
        &self,
        include_hidden: bool,
    ) -> Result<Vec<GuestbookMessage>, ListMessagesError> {
        self.guestbook
            .list(include_hidden)
            .await
            .map_err(|e| ListMessagesError::Repository(e.to_string()))
    }
}
