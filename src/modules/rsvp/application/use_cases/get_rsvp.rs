use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::rsvp::application::domain::rsvp::Rsvp;
use crate::modules::rsvp::application::ports::outgoing::{RsvpRepository, RsvpRepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GetRsvpError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IGetRsvpUseCase: Send + Sync {
    /// Returns the caller's RSVP, or None if they have not responded yet.
    async fn execute(&self, user_id: Uuid) -> Result<Option<Rsvp>, GetRsvpError>;
}

pub struct GetRsvpUseCase<R: RsvpRepository> {
    rsvps: Arc<R>,
}

impl<R: RsvpRepository> GetRsvpUseCase<R> {
    pub fn new(rsvps: Arc<R>) -> Self {
        Self { rsvps }
    }
}

#[async_trait]
impl<R: RsvpRepository> IGetRsvpUseCase for GetRsvpUseCase<R> {
    async fn execute(&self, user_id: Uuid) -> Result<Option<Rsvp>, GetRsvpError> {
        self.rsvps
            .find_by_user(user_id)
            .await
            .map_err(|e| GetRsvpError::Repository(e.to_string()))
    }
}
