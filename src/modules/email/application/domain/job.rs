use chrono::{DateTime, Duration, Utc};
use std::fmt;
use uuid::Uuid;

/// A job is abandoned once it has been attempted this many times.
pub const MAX_EMAIL_ATTEMPTS: i32 = 5;

/// Upper bound on jobs handled per queue pass.
pub const QUEUE_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailJobStatus {
    Pending,
    Retrying,
    Sent,
    Failed,
}

impl EmailJobStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "pending" => Some(Self::Pending),
            "retrying" => Some(Self::Retrying),
            "sent" => Some(Self::Sent),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Retrying => "retrying",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EmailJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wait before retry number `attempt_index + 1`. The schedule is fixed,
/// not exponential: 1, 5, 15, 30 minutes, then an hour between tries.
pub fn retry_delay(attempt_index: u32) -> Duration {
    match attempt_index {
        0 => Duration::minutes(1),
        1 => Duration::minutes(5),
        2 => Duration::minutes(15),
        3 => Duration::minutes(30),
        _ => Duration::minutes(60),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template: String,
    pub status: EmailJobStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl EmailJob {
    /// A job is due when it is pending, or retrying and its backoff window
    /// has elapsed. Sent and failed jobs are never due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            EmailJobStatus::Pending => true,
            EmailJobStatus::Retrying => match self.last_attempt_at {
                Some(last) => {
                    let attempt_index = (self.attempts.max(1) - 1) as u32;
                    now >= last + retry_delay(attempt_index)
                }
                // Retrying without a recorded attempt should not happen;
                // treat it as due rather than stranding the job.
                None => true,
            },
            EmailJobStatus::Sent | EmailJobStatus::Failed => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(status: EmailJobStatus, attempts: i32, last_attempt_at: Option<DateTime<Utc>>) -> EmailJob {
        EmailJob {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            template: "rsvp_reminder".to_string(),
            status,
            attempts,
            last_error: None,
            last_attempt_at,
            sent_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn retry_schedule_is_fixed() {
        assert_eq!(retry_delay(0), Duration::minutes(1));
        assert_eq!(retry_delay(1), Duration::minutes(5));
        assert_eq!(retry_delay(2), Duration::minutes(15));
        assert_eq!(retry_delay(3), Duration::minutes(30));
        assert_eq!(retry_delay(4), Duration::minutes(60));
        assert_eq!(retry_delay(17), Duration::minutes(60));
    }

    #[test]
    fn pending_jobs_are_always_due() {
        let now = Utc::now();
        assert!(job(EmailJobStatus::Pending, 0, None).is_due(now));
        assert!(job(EmailJobStatus::Pending, 0, Some(now)).is_due(now));
    }

    #[test]
    fn retrying_job_waits_out_its_backoff() {
        let now = Utc::now();
        // first retry waits one minute
        let fresh = job(EmailJobStatus::Retrying, 1, Some(now - Duration::seconds(30)));
        assert!(!fresh.is_due(now));

        let ripe = job(EmailJobStatus::Retrying, 1, Some(now - Duration::seconds(61)));
        assert!(ripe.is_due(now));
    }

    #[test]
    fn later_retries_wait_longer() {
        let now = Utc::now();
        let third = job(
            EmailJobStatus::Retrying,
            3,
            Some(now - Duration::minutes(10)),
        );
        // third attempt index is 2, so the window is 15 minutes
        assert!(!third.is_due(now));
        let third_ripe = job(
            EmailJobStatus::Retrying,
            3,
            Some(now - Duration::minutes(16)),
        );
        assert!(third_ripe.is_due(now));
    }

    #[test]
    fn terminal_jobs_are_never_due() {
        let now = Utc::now();
        assert!(!job(EmailJobStatus::Sent, 1, Some(now - Duration::hours(2))).is_due(now));
        assert!(!job(EmailJobStatus::Failed, 5, Some(now - Duration::hours(2))).is_due(now));
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            EmailJobStatus::Pending,
            EmailJobStatus::Retrying,
            EmailJobStatus::Sent,
            EmailJobStatus::Failed,
        ] {
            assert_eq!(EmailJobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EmailJobStatus::parse("queued"), None);
    }
}
