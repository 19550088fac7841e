use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::modules::auth::application::ports::outgoing::user_query::UserQuery;
use crate::modules::email::application::domain::job::{
    EmailJob, EmailJobStatus, MAX_EMAIL_ATTEMPTS, QUEUE_BATCH_SIZE,
};
use crate::modules::email::application::domain::template::EmailTemplate;
use crate::modules::email::application::ports::outgoing::{EmailJobRepository, EmailSender};

pub const USER_NOT_FOUND_ERROR: &str = "User not found";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessQueueError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IProcessEmailQueueUseCase: Send + Sync {
    /// Runs one queue pass and returns the number of jobs processed,
    /// whether or not each delivery succeeded.
    async fn execute(&self) -> Result<usize, ProcessQueueError>;
}

pub struct ProcessEmailQueueUseCase<J, Q, S>
where
    J: EmailJobRepository,
    Q: UserQuery,
    S: EmailSender,
{
    jobs: Arc<J>,
    users: Arc<Q>,
    sender: Arc<S>,
}

impl<J, Q, S> ProcessEmailQueueUseCase<J, Q, S>
where
    J: EmailJobRepository,
    Q: UserQuery,
    S: EmailSender,
{
    pub fn new(jobs: Arc<J>, users: Arc<Q>, sender: Arc<S>) -> Self {
        Self { jobs, users, sender }
    }

    /// Attempts one job. Returns true if the email went out. Every exit
    /// path updates the job row so an attempt is never silently lost.
    pub async fn process_job(&self, job: &EmailJob) -> Result<bool, ProcessQueueError> {
        let now = Utc::now();
        let attempts = job.attempts + 1;

        let user = match self.users.find_by_id(job.user_id).await {
            Ok(user) => user,
            Err(e) => {
                self.record_failure(job, attempts, &e.to_string()).await?;
                return Ok(false);
            }
        };

        let Some(user) = user else {
            // The recipient row is gone; retrying can never succeed.
            self.jobs
                .mark_failed_attempt(
                    job.id,
                    attempts,
                    EmailJobStatus::Failed,
                    USER_NOT_FOUND_ERROR,
                    now,
                )
                .await
                .map_err(|e| ProcessQueueError::Repository(e.to_string()))?;
            tracing::warn!(job_id = %job.id, user_id = %job.user_id, "email job failed: recipient no longer exists");
            return Ok(false);
        };

        let Some(template) = EmailTemplate::lookup(&job.template) else {
            let error = format!("Unknown email template: {}", job.template);
            self.record_failure(job, attempts, &error).await?;
            return Ok(false);
        };

        let rendered = template.render(&user);
        match self
            .sender
            .send_email(&user.email, &rendered.subject, &rendered.body)
            .await
        {
            Ok(()) => {
                self.jobs
                    .mark_sent(job.id, attempts, now)
                    .await
                    .map_err(|e| ProcessQueueError::Repository(e.to_string()))?;
                tracing::info!(job_id = %job.id, template = %job.template, "email sent");
                Ok(true)
            }
            Err(error) => {
                self.record_failure(job, attempts, &error).await?;
                Ok(false)
            }
        }
    }

    async fn record_failure(
        &self,
        job: &EmailJob,
        attempts: i32,
        error: &str,
    ) -> Result<(), ProcessQueueError> {
        let status = if attempts >= MAX_EMAIL_ATTEMPTS {
            EmailJobStatus::Failed
        } else {
            EmailJobStatus::Retrying
        };

        self.jobs
            .mark_failed_attempt(job.id, attempts, status, error, Utc::now())
            .await
            .map_err(|e| ProcessQueueError::Repository(e.to_string()))?;

        tracing::warn!(
            job_id = %job.id,
            attempts,
            status = %status,
            error,
            "email attempt failed"
        );
        Ok(())
    }
}

#[async_trait]
impl<J, Q, S> IProcessEmailQueueUseCase for ProcessEmailQueueUseCase<J, Q, S>
where
    J: EmailJobRepository,
    Q: UserQuery,
    S: EmailSender,
{
    async fn execute(&self) -> Result<usize, ProcessQueueError> {
        let now = Utc::now();
        let candidates = self
            .jobs
            .find_processable()
            .await
            .map_err(|e| ProcessQueueError::Repository(e.to_string()))?;

        let due: Vec<EmailJob> = candidates
            .into_iter()
            .filter(|job| job.is_due(now))
            .take(QUEUE_BATCH_SIZE)
            .collect();

        let mut sent = 0;
        for job in &due {
            // One broken job must not stall the rest of the batch.
            match self.process_job(job).await {
                Ok(true) => sent += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(job_id = %job.id, error = %e, "queue pass could not update job");
                }
            }
        }

        tracing::info!(processed = due.len(), sent, "email queue pass complete");
        Ok(due.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::application::domain::entities::Guest;
    use crate::modules::auth::application::ports::outgoing::user_query::UserQuery;
    use crate::modules::auth::application::ports::outgoing::user_repository::UserStoreError;
    use crate::modules::email::application::ports::outgoing::{
        EmailJobRepositoryError, NewEmailJob,
    };
    use chrono::{DateTime, Duration};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    enum Recorded {
        Sent {
            job_id: Uuid,
            attempts: i32,
        },
        FailedAttempt {
            job_id: Uuid,
            attempts: i32,
            status: EmailJobStatus,
            error: String,
        },
    }

    struct StubJobRepo {
        processable: Vec<EmailJob>,
        writes: Mutex<Vec<Recorded>>,
    }

    impl StubJobRepo {
        fn new(processable: Vec<EmailJob>) -> Self {
            Self {
                processable,
                writes: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl EmailJobRepository for StubJobRepo {
        async fn insert(&self, _job: NewEmailJob) -> Result<EmailJob, EmailJobRepositoryError> {
            Err(EmailJobRepositoryError::Database("unused".to_string()))
        }

        async fn find_processable(&self) -> Result<Vec<EmailJob>, EmailJobRepositoryError> {
            Ok(self.processable.clone())
        }

        async fn mark_sent(
            &self,
            job_id: Uuid,
            attempts: i32,
            _sent_at: DateTime<Utc>,
        ) -> Result<(), EmailJobRepositoryError> {
            self.writes
                .lock()
                .unwrap()
                .push(Recorded::Sent { job_id, attempts });
            Ok(())
        }

        async fn mark_failed_attempt(
            &self,
            job_id: Uuid,
            attempts: i32,
            status: EmailJobStatus,
            error: &str,
            _attempted_at: DateTime<Utc>,
        ) -> Result<(), EmailJobRepositoryError> {
            self.writes.lock().unwrap().push(Recorded::FailedAttempt {
                job_id,
                attempts,
                status,
                error: error.to_string(),
            });
            Ok(())
        }

        async fn history(
            &self,
            _limit: u64,
            _status: Option<EmailJobStatus>,
        ) -> Result<Vec<EmailJob>, EmailJobRepositoryError> {
            Ok(vec![])
        }
    }

    struct StubUserQuery {
        user: Option<Guest>,
    }

    #[async_trait]
    impl UserQuery for StubUserQuery {
        async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<Guest>, UserStoreError> {
            Ok(self.user.clone())
        }

        async fn find_by_qr_token(&self, _qr_token: &str) -> Result<Option<Guest>, UserStoreError> {
            Ok(None)
        }

        async fn find_by_qr_alias(&self, _qr_alias: &str) -> Result<Option<Guest>, UserStoreError> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<Guest>, UserStoreError> {
            Ok(None)
        }
    }

    struct StubSender {
        fail_with: Option<String>,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmailSender for StubSender {
        async fn send_email(&self, to: &str, _subject: &str, _body: &str) -> Result<(), String> {
            if let Some(error) = &self.fail_with {
                return Err(error.clone());
            }
            self.sent.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    fn guest() -> Guest {
        Guest {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            full_name: "Jane Doe".to_string(),
            is_invited: true,
            has_rsvped: false,
            is_admin: false,
            qr_token: "tok".to_string(),
            qr_alias: None,
            household_members: vec![],
            address_line: None,
            city: None,
            postal_code: None,
            country: None,
            personal_note: None,
            rsvp_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending_job(template: &str) -> EmailJob {
        EmailJob {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            template: template.to_string(),
            status: EmailJobStatus::Pending,
            attempts: 0,
            last_error: None,
            last_attempt_at: None,
            sent_at: None,
            created_at: Utc::now(),
        }
    }

    fn use_case(
        jobs: Arc<StubJobRepo>,
        user: Option<Guest>,
        fail_with: Option<String>,
    ) -> ProcessEmailQueueUseCase<StubJobRepo, StubUserQuery, StubSender> {
        ProcessEmailQueueUseCase::new(
            jobs,
            Arc::new(StubUserQuery { user }),
            Arc::new(StubSender {
                fail_with,
                sent: Mutex::new(vec![]),
            }),
        )
    }

    #[tokio::test]
    async fn successful_send_marks_job_sent() {
        let job = pending_job("rsvp_reminder");
        let job_id = job.id;
        let jobs = Arc::new(StubJobRepo::new(vec![job]));
        let uc = use_case(jobs.clone(), Some(guest()), None);

        let processed = uc.execute().await.unwrap();

        assert_eq!(processed, 1);
        let writes = jobs.writes.lock().unwrap();
        assert_eq!(
            writes.as_slice(),
            &[Recorded::Sent {
                job_id,
                attempts: 1
            }]
        );
    }

    #[tokio::test]
    async fn delivery_failure_schedules_retry() {
        let job = pending_job("rsvp_reminder");
        let job_id = job.id;
        let jobs = Arc::new(StubJobRepo::new(vec![job]));
        let uc = use_case(jobs.clone(), Some(guest()), Some("smtp timeout".to_string()));

        // the failed attempt still counts as processed
        let processed = uc.execute().await.unwrap();

        assert_eq!(processed, 1);
        let writes = jobs.writes.lock().unwrap();
        assert_eq!(
            writes.as_slice(),
            &[Recorded::FailedAttempt {
                job_id,
                attempts: 1,
                status: EmailJobStatus::Retrying,
                error: "smtp timeout".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn fifth_failed_attempt_is_terminal() {
        let mut job = pending_job("rsvp_reminder");
        job.status = EmailJobStatus::Retrying;
        job.attempts = 4;
        job.last_attempt_at = Some(Utc::now() - Duration::hours(2));
        let job_id = job.id;
        let jobs = Arc::new(StubJobRepo::new(vec![job]));
        let uc = use_case(jobs.clone(), Some(guest()), Some("still down".to_string()));

        uc.execute().await.unwrap();

        let writes = jobs.writes.lock().unwrap();
        assert_eq!(
            writes.as_slice(),
            &[Recorded::FailedAttempt {
                job_id,
                attempts: 5,
                status: EmailJobStatus::Failed,
                error: "still down".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn missing_user_fails_job_immediately() {
        let job = pending_job("rsvp_reminder");
        let job_id = job.id;
        let jobs = Arc::new(StubJobRepo::new(vec![job]));
        let uc = use_case(jobs.clone(), None, None);

        let processed = uc.execute().await.unwrap();

        assert_eq!(processed, 1);
        let writes = jobs.writes.lock().unwrap();
        // terminal on the first attempt, no retry schedule
        assert_eq!(
            writes.as_slice(),
            &[Recorded::FailedAttempt {
                job_id,
                attempts: 1,
                status: EmailJobStatus::Failed,
                error: "User not found".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn unknown_template_counts_as_failed_attempt() {
        let job = pending_job("no_such_template");
        let jobs = Arc::new(StubJobRepo::new(vec![job]));
        let uc = use_case(jobs.clone(), Some(guest()), None);

        uc.execute().await.unwrap();

        let writes = jobs.writes.lock().unwrap();
        match &writes[0] {
            Recorded::FailedAttempt { status, error, .. } => {
                assert_eq!(*status, EmailJobStatus::Retrying);
                assert!(error.contains("no_such_template"));
            }
            other => panic!("expected failed attempt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn batch_is_capped_at_ten_jobs() {
        let jobs_list: Vec<EmailJob> = (0..15).map(|_| pending_job("rsvp_reminder")).collect();
        let jobs = Arc::new(StubJobRepo::new(jobs_list));
        let uc = use_case(jobs.clone(), Some(guest()), None);

        let processed = uc.execute().await.unwrap();

        assert_eq!(processed, 10);
        assert_eq!(jobs.writes.lock().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn processed_count_includes_failed_deliveries() {
        let good = pending_job("rsvp_reminder");
        let bad = pending_job("no_such_template");
        let jobs = Arc::new(StubJobRepo::new(vec![good.clone(), bad.clone()]));
        let uc = use_case(jobs.clone(), Some(guest()), None);

        let processed = uc.execute().await.unwrap();

        assert_eq!(processed, 2);
        let writes = jobs.writes.lock().unwrap();
        assert!(matches!(writes[0], Recorded::Sent { job_id, .. } if job_id == good.id));
        assert!(
            matches!(&writes[1], Recorded::FailedAttempt { job_id, .. } if *job_id == bad.id)
        );
    }

    #[tokio::test]
    async fn backoff_window_excludes_fresh_retries() {
        let mut fresh = pending_job("rsvp_reminder");
        fresh.status = EmailJobStatus::Retrying;
        fresh.attempts = 2;
        fresh.last_attempt_at = Some(Utc::now() - Duration::minutes(1));

        let jobs = Arc::new(StubJobRepo::new(vec![fresh]));
        let uc = use_case(jobs.clone(), Some(guest()), None);

        let processed = uc.execute().await.unwrap();

        // second retry waits five minutes; nothing is eligible yet
        assert_eq!(processed, 0);
        assert!(jobs.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_queue_writes_nothing() {
        let jobs = Arc::new(StubJobRepo::new(vec![]));
        let uc = use_case(jobs.clone(), Some(guest()), None);

        let processed = uc.execute().await.unwrap();

        assert_eq!(processed, 0);
        assert!(jobs.writes.lock().unwrap().is_empty());
    }
}
