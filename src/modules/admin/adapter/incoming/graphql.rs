use async_graphql::{Context, InputObject, Object, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use tracing::error;
use uuid::Uuid;

use crate::admin::application::use_cases::create_guest::{CreateGuestError, CreateGuestRequest};
use crate::admin::application::use_cases::rsvp_stats::RsvpStats;
use crate::admin::application::use_cases::send_reminder::{BulkReminderOutcome, SendReminderError};
use crate::api::graphql::error as gql;
use crate::auth::adapter::incoming::graphql::UserObject;
use crate::auth::application::domain::entities::HouseholdMember;
use crate::auth::application::services::Session;
use crate::email::application::domain::job::{EmailJob, EmailJobStatus};
use crate::AppState;

#[derive(SimpleObject)]
#[graphql(name = "EmailJobHistory")]
pub struct EmailJobObject {
    pub id: ID,
    pub user_id: ID,
    pub template: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<EmailJob> for EmailJobObject {
    fn from(job: EmailJob) -> Self {
        Self {
            id: ID(job.id.to_string()),
            user_id: ID(job.user_id.to_string()),
            template: job.template,
            status: job.status.as_str().to_string(),
            attempts: job.attempts,
            last_error: job.last_error,
            last_attempt_at: job.last_attempt_at,
            sent_at: job.sent_at,
            created_at: job.created_at,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "RSVPStats")]
pub struct RsvpStatsObject {
    pub invited: u64,
    pub responded: u64,
    pub attending_yes: u64,
    pub attending_no: u64,
    pub attending_maybe: u64,
    pub expected_guests: u64,
}

impl From<RsvpStats> for RsvpStatsObject {
    fn from(stats: RsvpStats) -> Self {
        Self {
            invited: stats.invited,
            responded: stats.responded,
            attending_yes: stats.attending_yes,
            attending_no: stats.attending_no,
            attending_maybe: stats.attending_maybe,
            expected_guests: stats.expected_guests,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "EmailResult")]
pub struct EmailResultObject {
    pub success: bool,
    pub job_id: Option<ID>,
    pub message: String,
}

#[derive(SimpleObject)]
#[graphql(name = "BulkEmailResult")]
pub struct BulkReminderResultObject {
    pub queued: Vec<ID>,
    pub skipped: Vec<ID>,
}

impl From<BulkReminderOutcome> for BulkReminderResultObject {
    fn from(outcome: BulkReminderOutcome) -> Self {
        Self {
            queued: outcome
                .queued
                .into_iter()
                .map(|id| ID(id.to_string()))
                .collect(),
            skipped: outcome
                .skipped
                .into_iter()
                .map(|id| ID(id.to_string()))
                .collect(),
        }
    }
}

#[derive(InputObject)]
pub struct HouseholdMemberInput {
    pub first_name: String,
    pub last_name: String,
    pub relation: Option<String>,
}

impl From<HouseholdMemberInput> for HouseholdMember {
    fn from(input: HouseholdMemberInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            relation: input.relation,
        }
    }
}

#[derive(InputObject)]
pub struct CreateGuestInput {
    pub email: String,
    pub full_name: String,
    #[graphql(default = true)]
    pub is_invited: bool,
    #[graphql(default = false)]
    pub is_admin: bool,
    pub qr_alias: Option<String>,
    #[graphql(default)]
    pub household_members: Vec<HouseholdMemberInput>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub personal_note: Option<String>,
}

fn parse_status(value: &str) -> Result<EmailJobStatus> {
    EmailJobStatus::parse(value)
        .ok_or_else(|| gql::bad_user_input(format!("Unknown status: {value}")))
}

fn parse_user_id(id: &ID) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| gql::bad_user_input("Invalid user id"))
}

#[derive(Default)]
pub struct AdminQueries;

#[Object]
impl AdminQueries {
    /// Delivery log for queued emails, newest first.
    async fn email_send_history(
        &self,
        ctx: &Context<'_>,
        limit: Option<u64>,
        status: Option<String>,
    ) -> Result<Vec<EmailJobObject>> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        let status = status.as_deref().map(parse_status).transpose()?;

        match state.email_history_use_case.execute(limit, status).await {
            Ok(jobs) => Ok(jobs.into_iter().map(Into::into).collect()),
            Err(e) => {
                error!("email history lookup failed: {e}");
                Err(gql::internal())
            }
        }
    }

    #[graphql(name = "rsvpStats")]
    async fn rsvp_stats(&self, ctx: &Context<'_>) -> Result<RsvpStatsObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.rsvp_stats_use_case.execute().await {
            Ok(stats) => Ok(stats.into()),
            Err(e) => {
                error!("stats aggregation failed: {e}");
                Err(gql::internal())
            }
        }
    }

    async fn admin_list_guests(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.list_guests_use_case.execute().await {
            Ok(guests) => Ok(guests.into_iter().map(Into::into).collect()),
            Err(e) => {
                error!("guest listing failed: {e}");
                Err(gql::internal())
            }
        }
    }

    /// The roster as CSV, joined with RSVP state.
    async fn export_guest_list(&self, ctx: &Context<'_>) -> Result<String> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.export_guests_use_case.execute().await {
            Ok(csv) => Ok(csv),
            Err(e) => {
                error!("guest export failed: {e}");
                Err(gql::internal())
            }
        }
    }
}

#[derive(Default)]
pub struct AdminMutations;

#[Object]
impl AdminMutations {
    async fn admin_send_reminder_email(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
    ) -> Result<EmailResultObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        let user_id = parse_user_id(&user_id)?;
        match state.send_reminder_use_case.execute(user_id).await {
            Ok(job) => Ok(EmailResultObject {
                success: true,
                job_id: Some(ID(job.id.to_string())),
                message: "Reminder email queued".to_string(),
            }),
            Err(SendReminderError::UserNotFound) => Err(gql::not_found("User not found")),
            Err(e) => {
                error!("reminder queueing failed: {e}");
                Err(gql::internal())
            }
        }
    }

    async fn admin_send_bulk_reminder_emails(
        &self,
        ctx: &Context<'_>,
        user_ids: Option<Vec<ID>>,
    ) -> Result<BulkReminderResultObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        let user_ids = user_ids
            .map(|ids| ids.iter().map(parse_user_id).collect::<Result<Vec<_>>>())
            .transpose()?;

        match state.send_reminder_use_case.execute_bulk(user_ids).await {
            Ok(outcome) => Ok(outcome.into()),
            Err(e) => {
                error!("bulk reminder run failed: {e}");
                Err(gql::internal())
            }
        }
    }

    async fn admin_create_guest(
        &self,
        ctx: &Context<'_>,
        input: CreateGuestInput,
    ) -> Result<UserObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        let request = CreateGuestRequest {
            email: input.email,
            full_name: input.full_name,
            is_invited: input.is_invited,
            is_admin: input.is_admin,
            qr_alias: input.qr_alias,
            household_members: input
                .household_members
                .into_iter()
                .map(Into::into)
                .collect(),
            address_line: input.address_line,
            city: input.city,
            postal_code: input.postal_code,
            country: input.country,
            personal_note: input.personal_note,
        };

        match state.create_guest_use_case.execute(request).await {
            Ok(guest) => Ok(guest.into()),
            Err(e @ (CreateGuestError::InvalidEmail
            | CreateGuestError::MissingName
            | CreateGuestError::Duplicate(_))) => Err(gql::bad_user_input(e.to_string())),
            Err(e) => {
                error!("guest creation failed: {e}");
                Err(gql::internal())
            }
        }
    }

    /// Runs one queue pass immediately instead of waiting for the ticker.
    /// Returns the number of jobs processed.
    async fn process_email_queue(&self, ctx: &Context<'_>) -> Result<i32> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.process_email_queue_use_case.execute().await {
            Ok(processed) => Ok(processed as i32),
            Err(e) => {
                error!("manual queue pass failed: {e}");
                Err(gql::internal())
            }
        }
    }
}
