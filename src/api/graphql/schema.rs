use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::admin::adapter::incoming::graphql::{AdminMutations, AdminQueries};
use crate::auth::adapter::incoming::graphql::{AuthMutations, AuthQueries};
use crate::guestbook::adapter::incoming::graphql::{GuestbookMutations, GuestbookQueries};
use crate::rsvp::adapter::incoming::graphql::{RsvpMutations, RsvpQueries};
use crate::AppState;

#[derive(MergedObject, Default)]
pub struct QueryRoot(AuthQueries, RsvpQueries, GuestbookQueries, AdminQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AuthMutations,
    RsvpMutations,
    GuestbookMutations,
    AdminMutations,
);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state)
    .finish()
}
