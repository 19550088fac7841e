use async_graphql::{Context, InputObject, Object, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use tracing::error;

use crate::api::graphql::error as gql;
use crate::auth::application::services::Session;
use crate::rsvp::application::domain::rsvp::{Rsvp, RsvpDraft, RsvpGuest, RsvpGuestDraft};
use crate::rsvp::application::use_cases::create_rsvp::CreateRsvpError;
use crate::rsvp::application::use_cases::edit_rsvp::EditRsvpError;
use crate::AppState;

#[derive(SimpleObject)]
#[graphql(name = "RSVPGuest")]
pub struct RsvpGuestObject {
    pub full_name: String,
    pub meal_preference: String,
    pub allergies: Option<String>,
}

impl From<RsvpGuest> for RsvpGuestObject {
    fn from(guest: RsvpGuest) -> Self {
        Self {
            full_name: guest.full_name,
            meal_preference: guest.meal_preference,
            allergies: guest.allergies,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "RSVP")]
pub struct RsvpObject {
    pub id: ID,
    pub user_id: ID,
    pub attending: String,
    pub guest_count: i32,
    pub guests: Vec<RsvpGuestObject>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Rsvp> for RsvpObject {
    fn from(rsvp: Rsvp) -> Self {
        Self {
            id: ID(rsvp.id.to_string()),
            user_id: ID(rsvp.user_id.to_string()),
            attending: rsvp.attendance.as_str().to_string(),
            guest_count: rsvp.guest_count,
            guests: rsvp.guests.into_iter().map(Into::into).collect(),
            notes: rsvp.notes,
            created_at: rsvp.created_at,
            updated_at: rsvp.updated_at,
        }
    }
}

#[derive(InputObject)]
#[graphql(name = "GuestInput")]
pub struct GuestInput {
    pub full_name: String,
    pub meal_preference: String,
    pub allergies: Option<String>,
}

impl From<GuestInput> for RsvpGuestDraft {
    fn from(input: GuestInput) -> Self {
        Self {
            full_name: input.full_name,
            meal_preference: input.meal_preference,
            allergies: input.allergies,
        }
    }
}

#[derive(InputObject)]
#[graphql(name = "CreateRSVPInput")]
pub struct CreateRsvpInput {
    pub attending: String,
    pub guest_count: Option<i32>,
    #[graphql(default)]
    pub guests: Vec<GuestInput>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
#[graphql(name = "RSVPInput")]
pub struct RsvpInput {
    pub attending: String,
    pub guest_count: Option<i32>,
    #[graphql(default)]
    pub guests: Vec<GuestInput>,
    pub notes: Option<String>,
}

fn draft(
    attending: String,
    guest_count: Option<i32>,
    guests: Vec<GuestInput>,
    notes: Option<String>,
) -> RsvpDraft {
    RsvpDraft {
        attending,
        guest_count,
        guests: guests.into_iter().map(Into::into).collect(),
        notes,
    }
}

#[derive(Default)]
pub struct RsvpQueries;

#[Object]
impl RsvpQueries {
    /// The caller's RSVP, or null when none has been submitted.
    #[graphql(name = "getRSVP")]
    async fn get_rsvp(&self, ctx: &Context<'_>) -> Result<Option<RsvpObject>> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        let user = session.require_auth().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.get_rsvp_use_case.execute(user.id).await {
            Ok(rsvp) => Ok(rsvp.map(Into::into)),
            Err(e) => {
                error!("RSVP lookup failed: {e}");
                Err(gql::internal())
            }
        }
    }
}

#[derive(Default)]
pub struct RsvpMutations;

#[Object]
impl RsvpMutations {
    #[graphql(name = "createRSVP")]
    async fn create_rsvp(&self, ctx: &Context<'_>, input: CreateRsvpInput) -> Result<RsvpObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        let user = session.require_auth().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        let result = state
            .create_rsvp_use_case
            .execute(
                user.id,
                draft(input.attending, input.guest_count, input.guests, input.notes),
            )
            .await;

        match result {
            Ok(rsvp) => Ok(rsvp.into()),
            Err(CreateRsvpError::AlreadySubmitted) => {
                Err(gql::bad_user_input("You have already submitted an RSVP"))
            }
            Err(CreateRsvpError::Validation(e)) => Err(gql::bad_user_input(e.to_string())),
            Err(e) => {
                error!("RSVP creation failed: {e}");
                Err(gql::internal())
            }
        }
    }

    #[graphql(name = "editRSVP")]
    async fn edit_rsvp(&self, ctx: &Context<'_>, updates: RsvpInput) -> Result<RsvpObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        let user = session.require_auth().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        let result = state
            .edit_rsvp_use_case
            .execute(
                user.id,
                draft(
                    updates.attending,
                    updates.guest_count,
                    updates.guests,
                    updates.notes,
                ),
            )
            .await;

        match result {
            Ok(rsvp) => Ok(rsvp.into()),
            Err(EditRsvpError::NotFound) => Err(gql::not_found("No RSVP found to edit")),
            Err(EditRsvpError::Validation(e)) => Err(gql::bad_user_input(e.to_string())),
            Err(e) => {
                error!("RSVP update failed: {e}");
                Err(gql::internal())
            }
        }
    }
}
