use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::email::application::domain::job::EmailJob;
use crate::modules::email::application::ports::outgoing::{
    EmailJobRepository, NewEmailJob,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnqueueEmailError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IEnqueueEmailUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid, template: &str) -> Result<EmailJob, EnqueueEmailError>;
}

/// Accepts any template name; resolution happens when the queue runs.
/// A typo'd template shows up in the send history as a failing job
/// instead of a lost request.
pub struct EnqueueEmailUseCase<J: EmailJobRepository> {
    jobs: Arc<J>,
}

impl<J: EmailJobRepository> EnqueueEmailUseCase<J> {
    pub fn new(jobs: Arc<J>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl<J: EmailJobRepository> IEnqueueEmailUseCase for EnqueueEmailUseCase<J> {
    async fn execute(&self, user_id: Uuid, template: &str) -> Result<EmailJob, EnqueueEmailError> {
        let job = self
            .jobs
            .insert(NewEmailJob {
                user_id,
                template: template.to_string(),
            })
            .await
            .map_err(|e| EnqueueEmailError::Repository(e.to_string()))?;

        tracing::info!(job_id = %job.id, user_id = %user_id, template, "email job queued");
        Ok(job)
    }
}
