use async_graphql::{Context, Object, Result, SimpleObject, ID};
use tracing::{error, warn};

use crate::api::graphql::error as gql;
use crate::auth::application::domain::entities::{Guest, HouseholdMember};
use crate::auth::application::services::Session;
use crate::auth::application::use_cases::login_with_qr_token::QrLoginError;
use crate::AppState;

#[derive(SimpleObject)]
#[graphql(name = "HouseholdMember")]
pub struct HouseholdMemberObject {
    pub first_name: String,
    pub last_name: String,
    pub relation: Option<String>,
}

impl From<HouseholdMember> for HouseholdMemberObject {
    fn from(member: HouseholdMember) -> Self {
        Self {
            first_name: member.first_name,
            last_name: member.last_name,
            relation: member.relation,
        }
    }
}

/// The guest as exposed to clients. QR credentials never leave the server.
#[derive(SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: ID,
    pub email: String,
    pub full_name: String,
    pub is_invited: bool,
    #[graphql(name = "hasRSVPed")]
    pub has_rsvped: bool,
    pub is_admin: bool,
    pub household_members: Vec<HouseholdMemberObject>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub personal_note: Option<String>,
    pub rsvp_id: Option<ID>,
}

impl From<Guest> for UserObject {
    fn from(guest: Guest) -> Self {
        Self {
            id: ID(guest.id.to_string()),
            email: guest.email,
            full_name: guest.full_name,
            is_invited: guest.is_invited,
            has_rsvped: guest.has_rsvped,
            is_admin: guest.is_admin,
            household_members: guest
                .household_members
                .into_iter()
                .map(Into::into)
                .collect(),
            address_line: guest.address_line,
            city: guest.city,
            postal_code: guest.postal_code,
            country: guest.country,
            personal_note: guest.personal_note,
            rsvp_id: guest.rsvp_id.map(|id| ID(id.to_string())),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "AuthPayload")]
pub struct AuthPayloadObject {
    pub token: String,
    pub user: UserObject,
}

#[derive(Default)]
pub struct AuthQueries;

#[Object]
impl AuthQueries {
    /// The guest bound to the current session, or null when anonymous.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        Ok(session.user().cloned().map(Into::into))
    }
}

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    async fn login_with_qr_token(
        &self,
        ctx: &Context<'_>,
        qr_token: String,
    ) -> Result<AuthPayloadObject> {
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.login_with_qr_token_use_case.execute(&qr_token).await {
            Ok(payload) => Ok(AuthPayloadObject {
                token: payload.token,
                user: payload.user.into(),
            }),
            Err(QrLoginError::UnknownToken) => {
                warn!("QR login rejected: unknown token");
                Err(gql::unauthenticated("Invalid QR code"))
            }
            Err(e) => {
                error!("QR login failed: {e}");
                Err(gql::internal())
            }
        }
    }
}
