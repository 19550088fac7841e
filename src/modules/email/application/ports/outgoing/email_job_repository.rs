use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::email::application::domain::job::{EmailJob, EmailJobStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailJobRepositoryError {
    #[error("Email job not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Debug, Clone)]
pub struct NewEmailJob {
    pub user_id: Uuid,
    pub template: String,
}

#[async_trait]
pub trait EmailJobRepository: Send + Sync {
    async fn insert(&self, job: NewEmailJob) -> Result<EmailJob, EmailJobRepositoryError>;

    /// All jobs that could possibly run: pending and retrying, oldest first.
    /// Backoff eligibility is decided by the caller.
    async fn find_processable(&self) -> Result<Vec<EmailJob>, EmailJobRepositoryError>;

    async fn mark_sent(
        &self,
        job_id: Uuid,
        attempts: i32,
        sent_at: DateTime<Utc>,
    ) -> Result<(), EmailJobRepositoryError>;

    async fn mark_failed_attempt(
        &self,
        job_id: Uuid,
        attempts: i32,
        status: EmailJobStatus,
        error: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<(), EmailJobRepositoryError>;

    /// Most recent jobs first, optionally filtered by status.
    async fn history(
        &self,
        limit: u64,
        status: Option<EmailJobStatus>,
    ) -> Result<Vec<EmailJob>, EmailJobRepositoryError>;
}
