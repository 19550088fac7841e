use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member of a guest's household, printed on the invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub relation: Option<String>,
}

/// An invited guest (the "User" of the public schema).
///
/// `qr_token` is the opaque credential embedded in the guest's printed QR
/// code; `qr_alias` is an optional human-readable fallback, stored lowercase.
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_invited: bool,
    pub has_rsvped: bool,
    pub is_admin: bool,
    pub qr_token: String,
    pub qr_alias: Option<String>,
    pub household_members: Vec<HouseholdMember>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub personal_note: Option<String>,
    pub rsvp_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }
}
