use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::domain::job::{EmailJob, EmailJobStatus};
use crate::modules::email::application::ports::outgoing::EmailJobRepository;

pub const DEFAULT_HISTORY_LIMIT: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailHistoryError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IEmailHistoryUseCase: Send + Sync {
    async fn execute(
        &self,
        limit: Option<u64>,
        status: Option<EmailJobStatus>,
    ) -> Result<Vec<EmailJob>, EmailHistoryError>;
}

pub struct EmailHistoryUseCase<J: EmailJobRepository> {
    jobs: Arc<J>,
}

impl<J: EmailJobRepository> EmailHistoryUseCase<J> {
    pub fn new(jobs: Arc<J>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl<J: EmailJobRepository> IEmailHistoryUseCase for EmailHistoryUseCase<J> {
    async fn execute(
        &self,
        limit: Option<u64>,
        status: Option<EmailJobStatus>,
    ) -> Result<Vec<EmailJob>, EmailHistoryError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.jobs
            .history(limit, status)
            .await
            .map_err(|e| EmailHistoryError::Repository(e.to_string()))
    }
}
