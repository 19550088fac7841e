use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::ports::outgoing::user_query::UserQuery;
use crate::modules::auth::application::ports::outgoing::user_repository::UserRepository;
use crate::modules::email::application::domain::job::EmailJob;
use crate::modules::email::application::use_cases::enqueue_email::IEnqueueEmailUseCase;

pub const REMINDER_TEMPLATE: &str = "rsvp_reminder";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendReminderError {
    #[error("User not found")]
    UserNotFound,
    #[error("Database error: {0}")]
    Repository(String),
}

/// Per-user outcome of a bulk reminder run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkReminderOutcome {
    pub queued: Vec<Uuid>,
    pub skipped: Vec<Uuid>,
}

#[async_trait]
pub trait ISendReminderUseCase: Send + Sync {
    /// Queues a reminder for one guest. Sending happens on the next
    /// queue pass, not here.
    async fn execute(&self, user_id: Uuid) -> Result<EmailJob, SendReminderError>;

    /// Queues reminders for the given guests, or for every invitee who
    /// has not responded when no ids are given. Individual failures are
    /// recorded, never aborting the rest.
    async fn execute_bulk(
        &self,
        user_ids: Option<Vec<Uuid>>,
    ) -> Result<BulkReminderOutcome, SendReminderError>;
}

pub struct SendReminderUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    users: Arc<Q>,
    roster: Arc<R>,
    enqueue_email: Arc<dyn IEnqueueEmailUseCase + Send + Sync>,
}

impl<Q, R> SendReminderUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    pub fn new(
        users: Arc<Q>,
        roster: Arc<R>,
        enqueue_email: Arc<dyn IEnqueueEmailUseCase + Send + Sync>,
    ) -> Self {
        Self {
            users,
            roster,
            enqueue_email,
        }
    }
}

#[async_trait]
impl<Q, R> ISendReminderUseCase for SendReminderUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    async fn execute(&self, user_id: Uuid) -> Result<EmailJob, SendReminderError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| SendReminderError::Repository(e.to_string()))?
            .ok_or(SendReminderError::UserNotFound)?;

        self.enqueue_email
            .execute(user.id, REMINDER_TEMPLATE)
            .await
            .map_err(|e| SendReminderError::Repository(e.to_string()))
    }

    async fn execute_bulk(
        &self,
        user_ids: Option<Vec<Uuid>>,
    ) -> Result<BulkReminderOutcome, SendReminderError> {
        let targets = match user_ids {
            Some(ids) => ids,
            None => self
                .roster
                .list_pending_invitees()
                .await
                .map_err(|e| SendReminderError::Repository(e.to_string()))?
                .into_iter()
                .map(|guest| guest.id)
                .collect(),
        };

        let mut outcome = BulkReminderOutcome::default();
        for user_id in targets {
            match self.execute(user_id).await {
                Ok(_) => outcome.queued.push(user_id),
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "reminder not queued");
                    outcome.skipped.push(user_id);
                }
            }
        }

        tracing::info!(
            queued = outcome.queued.len(),
            skipped = outcome.skipped.len(),
            "bulk reminder run complete"
        );
        Ok(outcome)
    }
}
