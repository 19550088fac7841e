use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::email::application::use_cases::enqueue_email::IEnqueueEmailUseCase;
use crate::modules::rsvp::application::domain::rsvp::{Rsvp, RsvpDraft};
use crate::modules::rsvp::application::use_cases::create_rsvp::{CreateRsvpError, ICreateRsvpUseCase};

pub const CONFIRMATION_TEMPLATE: &str = "rsvp_confirmation";

/// Creates the RSVP, then queues a confirmation email in the background.
/// A queue failure never fails the submission; the row is already committed.
pub struct RsvpSubmissionOrchestrator {
    create_rsvp: Arc<dyn ICreateRsvpUseCase + Send + Sync>,
    enqueue_email: Arc<dyn IEnqueueEmailUseCase + Send + Sync>,
}

impl RsvpSubmissionOrchestrator {
    pub fn new(
        create_rsvp: Arc<dyn ICreateRsvpUseCase + Send + Sync>,
        enqueue_email: Arc<dyn IEnqueueEmailUseCase + Send + Sync>,
    ) -> Self {
        Self {
            create_rsvp,
            enqueue_email,
        }
    }
}

#[async_trait]
impl ICreateRsvpUseCase for RsvpSubmissionOrchestrator {
    async fn execute(&self, user_id: Uuid, draft: RsvpDraft) -> Result<Rsvp, CreateRsvpError> {
        let rsvp = self.create_rsvp.execute(user_id, draft).await?;

        let enqueue = self.enqueue_email.clone();
        tokio::spawn(async move {
            if let Err(e) = enqueue.execute(user_id, CONFIRMATION_TEMPLATE).await {
                tracing::error!(user_id = %user_id, error = %e, "failed to queue confirmation email");
            }
        });

        Ok(rsvp)
    }
}
