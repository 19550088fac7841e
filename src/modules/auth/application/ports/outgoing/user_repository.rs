use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::{Guest, HouseholdMember};

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    /// A unique constraint was hit; the payload names the offending field.
    #[error("duplicate {0}")]
    Duplicate(&'static str),
    #[error("guest not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(String),
}

/// Everything needed to seed a guest onto the roster.
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub email: String,
    pub full_name: String,
    pub is_invited: bool,
    pub is_admin: bool,
    pub qr_token: String,
    pub qr_alias: Option<String>,
    pub household_members: Vec<HouseholdMember>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub personal_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterCounts {
    pub invited: u64,
    pub responded: u64,
}

/// Write-side port over the guest roster.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_guest(&self, guest: NewGuest) -> Result<Guest, UserStoreError>;

    /// Flags the guest as having responded. `rsvp_id` is recorded only when
    /// given (RSVP creation); edits pass `None` and leave it untouched.
    async fn mark_rsvped(&self, user_id: Uuid, rsvp_id: Option<Uuid>)
        -> Result<(), UserStoreError>;

    async fn list_guests(&self) -> Result<Vec<Guest>, UserStoreError>;

    /// Invited guests that have not yet RSVPed (bulk reminder targets).
    async fn list_pending_invitees(&self) -> Result<Vec<Guest>, UserStoreError>;

    async fn roster_counts(&self) -> Result<RosterCounts, UserStoreError>;
}
