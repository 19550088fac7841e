use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::auth::application::ports::outgoing::user_repository::UserRepository;
use crate::modules::rsvp::application::domain::rsvp::Attendance;
use crate::modules::rsvp::application::ports::outgoing::RsvpRepository;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RsvpStats {
    pub invited: u64,
    pub responded: u64,
    pub attending_yes: u64,
    pub attending_no: u64,
    pub attending_maybe: u64,
    /// Sum of guest counts over YES responses.
    pub expected_guests: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RsvpStatsError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IRsvpStatsUseCase: Send + Sync {
    async fn execute(&self) -> Result<RsvpStats, RsvpStatsError>;
}

pub struct RsvpStatsUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    rsvps: Arc<R>,
    users: Arc<U>,
}

impl<R, U> RsvpStatsUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    pub fn new(rsvps: Arc<R>, users: Arc<U>) -> Self {
        Self { rsvps, users }
    }
}

#[async_trait]
impl<R, U> IRsvpStatsUseCase for RsvpStatsUseCase<R, U>
where
    R: RsvpRepository,
    U: UserRepository,
{
    async fn execute(&self) -> Result<RsvpStats, RsvpStatsError> {
        let counts = self
            .users
            .roster_counts()
            .await
            .map_err(|e| RsvpStatsError::Repository(e.to_string()))?;

        let rsvps = self
            .rsvps
            .find_all()
            .await
            .map_err(|e| RsvpStatsError::Repository(e.to_string()))?;

        let mut stats = RsvpStats {
            invited: counts.invited,
            responded: counts.responded,
            ..Default::default()
        };

        for rsvp in rsvps {
            match rsvp.attendance {
                Attendance::Yes => {
                    stats.attending_yes += 1;
                    stats.expected_guests += rsvp.guest_count.max(0) as u64;
                }
                Attendance::Maybe => stats.attending_maybe += 1,
                Attendance::No => stats.attending_no += 1,
            }
        }

        Ok(stats)
    }
}
