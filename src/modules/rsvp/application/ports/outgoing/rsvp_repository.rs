use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::rsvp::application::domain::rsvp::{Rsvp, RsvpSubmission};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RsvpRepositoryError {
    #[error("RSVP already exists for this user")]
    AlreadyExists,
    #[error("RSVP not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(String),
}

/// Persistence port for RSVPs. One row per user, enforced by a unique
/// constraint on user_id.
#[async_trait]
pub trait RsvpRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: Uuid,
        submission: &RsvpSubmission,
    ) -> Result<Rsvp, RsvpRepositoryError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Rsvp>, RsvpRepositoryError>;

    async fn update_by_user(
        &self,
        user_id: Uuid,
        submission: &RsvpSubmission,
    ) -> Result<Rsvp, RsvpRepositoryError>;

    async fn find_all(&self) -> Result<Vec<Rsvp>, RsvpRepositoryError>;
}
