use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::email::application::domain::job::{EmailJob, EmailJobStatus};
use crate::email::application::ports::outgoing::{
    EmailJobRepository, EmailJobRepositoryError, NewEmailJob,
};

use super::sea_orm_entity::email_jobs::{
    ActiveModel as JobActiveModel, Column as JobColumn, Entity as JobEntity, Model as JobModel,
};

#[derive(Clone, Debug)]
pub struct EmailJobRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl EmailJobRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_job(model: JobModel) -> Result<EmailJob, EmailJobRepositoryError> {
        let status = EmailJobStatus::parse(&model.status).ok_or_else(|| {
            EmailJobRepositoryError::Database(format!(
                "corrupt status value in job {}: {}",
                model.id, model.status
            ))
        })?;

        Ok(EmailJob {
            id: model.id,
            user_id: model.user_id,
            template: model.template,
            status,
            attempts: model.attempts,
            last_error: model.last_error,
            last_attempt_at: model.last_attempt_at.map(|t| t.with_timezone(&Utc)),
            sent_at: model.sent_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl EmailJobRepository for EmailJobRepositoryPostgres {
    async fn insert(&self, job: NewEmailJob) -> Result<EmailJob, EmailJobRepositoryError> {
        let active_job = JobActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(job.user_id),
            template: Set(job.template),
            status: Set(EmailJobStatus::Pending.as_str().to_string()),
            attempts: Set(0),
            last_error: Set(None),
            last_attempt_at: Set(None),
            sent_at: Set(None),
            created_at: NotSet,
        };

        let inserted = active_job
            .insert(&*self.db)
            .await
            .map_err(|e| EmailJobRepositoryError::Database(e.to_string()))?;

        Self::map_to_job(inserted)
    }

    async fn find_processable(&self) -> Result<Vec<EmailJob>, EmailJobRepositoryError> {
        let rows = JobEntity::find()
            .filter(
                Condition::any()
                    .add(JobColumn::Status.eq(EmailJobStatus::Pending.as_str()))
                    .add(JobColumn::Status.eq(EmailJobStatus::Retrying.as_str())),
            )
            .order_by_asc(JobColumn::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(|e| EmailJobRepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_to_job).collect()
    }

    async fn mark_sent(
        &self,
        job_id: Uuid,
        attempts: i32,
        sent_at: DateTime<Utc>,
    ) -> Result<(), EmailJobRepositoryError> {
        let row = JobEntity::find_by_id(job_id)
            .one(&*self.db)
            .await
            .map_err(|e| EmailJobRepositoryError::Database(e.to_string()))?
            .ok_or(EmailJobRepositoryError::NotFound)?;

        let mut active_job: JobActiveModel = row.into();
        active_job.status = Set(EmailJobStatus::Sent.as_str().to_string());
        active_job.attempts = Set(attempts);
        active_job.last_error = Set(None);
        active_job.last_attempt_at = Set(Some(sent_at.into()));
        active_job.sent_at = Set(Some(sent_at.into()));

        active_job
            .update(&*self.db)
            .await
            .map_err(|e| EmailJobRepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn mark_failed_attempt(
        &self,
        job_id: Uuid,
        attempts: i32,
        status: EmailJobStatus,
        error: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<(), EmailJobRepositoryError> {
        let row = JobEntity::find_by_id(job_id)
            .one(&*self.db)
            .await
            .map_err(|e| EmailJobRepositoryError::Database(e.to_string()))?
            .ok_or(EmailJobRepositoryError::NotFound)?;

        let mut active_job: JobActiveModel = row.into();
        active_job.status = Set(status.as_str().to_string());
        active_job.attempts = Set(attempts);
        active_job.last_error = Set(Some(error.to_string()));
        active_job.last_attempt_at = Set(Some(attempted_at.into()));

        active_job
            .update(&*self.db)
            .await
            .map_err(|e| EmailJobRepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn history(
        &self,
        limit: u64,
        status: Option<EmailJobStatus>,
    ) -> Result<Vec<EmailJob>, EmailJobRepositoryError> {
        let mut query = JobEntity::find()
            .order_by_desc(JobColumn::CreatedAt)
            .limit(limit);

        if let Some(status) = status {
            query = query.filter(JobColumn::Status.eq(status.as_str()));
        }

        let rows = query
            .all(&*self.db)
            .await
            .map_err(|e| EmailJobRepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_to_job).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn mock_job_model(status: &str) -> JobModel {
        let now = Utc::now();
        JobModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            template: "rsvp_reminder".to_string(),
            status: status.to_string(),
            attempts: 0,
            last_error: None,
            last_attempt_at: None,
            sent_at: None,
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_processable_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                mock_job_model("pending"),
                mock_job_model("retrying"),
            ]])
            .into_connection();

        let repo = EmailJobRepositoryPostgres::new(Arc::new(db));
        let jobs = repo.find_processable().await.unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].status, EmailJobStatus::Pending);
        assert_eq!(jobs[1].status, EmailJobStatus::Retrying);
    }

    #[tokio::test]
    async fn corrupt_status_is_a_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![mock_job_model("exploded")]])
            .into_connection();

        let repo = EmailJobRepositoryPostgres::new(Arc::new(db));
        let result = repo.find_processable().await;

        match result.unwrap_err() {
            EmailJobRepositoryError::Database(msg) => assert!(msg.contains("exploded")),
            other => panic!("Expected Database error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mark_sent_on_missing_job_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<JobModel>::new()])
            .into_connection();

        let repo = EmailJobRepositoryPostgres::new(Arc::new(db));
        let result = repo.mark_sent(Uuid::new_v4(), 1, Utc::now()).await;

        assert!(matches!(result, Err(EmailJobRepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn mark_failed_attempt_updates_row() {
        let job = mock_job_model("pending");
        let job_id = job.id;
        let mut updated = job.clone();
        updated.status = "retrying".to_string();
        updated.attempts = 1;
        updated.last_error = Some("smtp timeout".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![job]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results(vec![vec![updated]])
            .into_connection();

        let repo = EmailJobRepositoryPostgres::new(Arc::new(db));
        let result = repo
            .mark_failed_attempt(job_id, 1, EmailJobStatus::Retrying, "smtp timeout", Utc::now())
            .await;

        assert!(result.is_ok());
    }
}
