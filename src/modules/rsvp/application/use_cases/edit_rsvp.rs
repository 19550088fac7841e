use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::ports::outgoing::user_repository::UserRepository;
use crate::modules::rsvp::application::domain::rsvp::{Rsvp, RsvpDraft, RsvpSubmission, RsvpValidationError};
use crate::modules::rsvp::application::ports::outgoing::{RsvpRepository, RsvpRepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditRsvpError {
    #[error("No RSVP found to edit")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] RsvpValidationError),
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IEditRsvpUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid, draft: RsvpDraft) -> Result<Rsvp, EditRsvpError>;
}

pub struct EditRsvpUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    rsvps: Arc<R>,
    users: Arc<U>,
}

impl<R, U> EditRsvpUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    pub fn new(rsvps: Arc<R>, users: Arc<U>) -> Self {
        Self { rsvps, users }
    }
}

#[async_trait]
impl<R, U> IEditRsvpUseCase for EditRsvpUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    async fn execute(&self, user_id: Uuid, draft: RsvpDraft) -> Result<Rsvp, EditRsvpError> {
        let submission = RsvpSubmission::new(draft)?;

        let rsvp = self
            .rsvps
            .update_by_user(user_id, &submission)
            .await
            .map_err(|e| match e {
                RsvpRepositoryError::NotFound => EditRsvpError::NotFound,
                other => EditRsvpError::Repository(other.to_string()),
            })?;

        if let Err(e) = self.users.mark_rsvped(user_id, None).await {
            tracing::warn!(user_id = %user_id, error = %e, "failed to refresh responded flag");
        }

        Ok(rsvp)
    }
}
