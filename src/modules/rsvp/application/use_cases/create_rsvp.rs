use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::ports::outgoing::user_repository::UserRepository;
use crate::modules::rsvp::application::domain::rsvp::{Rsvp, RsvpDraft, RsvpSubmission, RsvpValidationError};
use crate::modules::rsvp::application::ports::outgoing::{RsvpRepository, RsvpRepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateRsvpError {
    #[error("You have already submitted an RSVP")]
    AlreadySubmitted,
    #[error(transparent)]
    Validation(#[from] RsvpValidationError),
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait ICreateRsvpUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid, draft: RsvpDraft) -> Result<Rsvp, CreateRsvpError>;
}

pub struct CreateRsvpUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    rsvps: Arc<R>,
    users: Arc<U>,
}

impl<R, U> CreateRsvpUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    pub fn new(rsvps: Arc<R>, users: Arc<U>) -> Self {
        Self { rsvps, users }
    }
}

#[async_trait]
impl<R, U> ICreateRsvpUseCase for CreateRsvpUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    async fn execute(&self, user_id: Uuid, draft: RsvpDraft) -> Result<Rsvp, CreateRsvpError> {
        let submission = RsvpSubmission::new(draft)?;

        let rsvp = self.rsvps.insert(user_id, &submission).await.map_err(|e| match e {
            RsvpRepositoryError::AlreadyExists => CreateRsvpError::AlreadySubmitted,
            other => CreateRsvpError::Repository(other.to_string()),
        })?;

        // Best-effort flag update; the RSVP row is the source of truth.
        if let Err(e) = self.users.mark_rsvped(user_id, Some(rsvp.id)).await {
            tracing::warn!(user_id = %user_id, error = %e, "failed to flag user as responded");
        }

        Ok(rsvp)
    }
}
