use async_graphql::{Context, Object, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use tracing::error;
use uuid::Uuid;

use crate::api::graphql::error as gql;
use crate::auth::application::services::Session;
use crate::guestbook::application::domain::message::GuestbookMessage;
use crate::guestbook::application::use_cases::moderate_message::ModerateMessageError;
use crate::guestbook::application::use_cases::post_message::PostMessageError;
use crate::AppState;

#[derive(SimpleObject)]
#[graphql(name = "GuestbookMessage")]
pub struct GuestbookMessageObject {
    pub id: ID,
    pub author_name: String,
    pub message: String,
    pub is_approved: bool,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

impl From<GuestbookMessage> for GuestbookMessageObject {
    fn from(message: GuestbookMessage) -> Self {
        Self {
            id: ID(message.id.to_string()),
            author_name: message.author_name,
            message: message.message,
            is_approved: message.is_approved,
            is_visible: message.is_visible,
            created_at: message.created_at,
        }
    }
}

#[derive(Default)]
pub struct GuestbookQueries;

#[Object]
impl GuestbookQueries {
    /// Published guestbook entries, newest first. Admins may include
    /// unapproved and pulled ones.
    async fn guestbook_messages(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = false)] include_hidden: bool,
    ) -> Result<Vec<GuestbookMessageObject>> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_auth().map_err(gql::from_session_error)?;
        if include_hidden {
            session.require_admin().map_err(gql::from_session_error)?;
        }
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.list_messages_use_case.execute(include_hidden).await {
            Ok(messages) => Ok(messages.into_iter().map(Into::into).collect()),
            Err(e) => {
                error!("guestbook listing failed: {e}");
                Err(gql::internal())
            }
        }
    }
}

#[derive(Default)]
pub struct GuestbookMutations;

#[Object]
impl GuestbookMutations {
    async fn post_guestbook_message(
        &self,
        ctx: &Context<'_>,
        message: String,
    ) -> Result<GuestbookMessageObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        let user = session.require_auth().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        match state.post_message_use_case.execute(user, &message).await {
            Ok(posted) => Ok(posted.into()),
            Err(PostMessageError::Validation(e)) => Err(gql::bad_user_input(e.to_string())),
            Err(e) => {
                error!("guestbook post failed: {e}");
                Err(gql::internal())
            }
        }
    }

    async fn moderate_guestbook_message(
        &self,
        ctx: &Context<'_>,
        message_id: ID,
        is_approved: bool,
        is_visible: bool,
    ) -> Result<GuestbookMessageObject> {
        let session = ctx.data::<Session>().map_err(|_| gql::internal())?;
        session.require_admin().map_err(gql::from_session_error)?;
        let state = ctx.data::<AppState>().map_err(|_| gql::internal())?;

        let message_id = Uuid::parse_str(&message_id)
            .map_err(|_| gql::bad_user_input("Invalid message id"))?;

        match state
            .moderate_message_use_case
            .execute(message_id, is_approved, is_visible)
            .await
        {
            Ok(message) => Ok(message.into()),
            Err(ModerateMessageError::NotFound) => Err(gql::not_found("Message not found")),
            Err(e) => {
                error!("guestbook moderation failed: {e}");
                Err(gql::internal())
            }
        }
    }
}
