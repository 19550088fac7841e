use async_trait::async_trait;
use email_address::EmailAddress;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;

use crate::modules::auth::application::domain::entities::{Guest, HouseholdMember};
use crate::modules::auth::application::ports::outgoing::user_repository::{
    NewGuest, UserRepository, UserStoreError,
};

const QR_TOKEN_LEN: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct CreateGuestRequest {
    pub email: String,
    pub full_name: String,
    pub is_invited: bool,
    pub is_admin: bool,
    pub qr_alias: Option<String>,
    pub household_members: Vec<HouseholdMember>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub personal_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateGuestError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Full name is required")]
    MissingName,
    #[error("A guest with this {0} already exists")]
    Duplicate(&'static str),
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait ICreateGuestUseCase: Send + Sync {
    async fn execute(&self, request: CreateGuestRequest) -> Result<Guest, CreateGuestError>;
}

pub struct CreateGuestUseCase<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> CreateGuestUseCase<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    fn generate_qr_token() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(QR_TOKEN_LEN)
            .map(char::from)
            .collect()
    }

    /// Aliases are matched lowercase at login, so they are stored lowercase.
    fn normalize_alias(alias: Option<String>) -> Option<String> {
        alias
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
    }
}

#[async_trait]
impl<U: UserRepository> ICreateGuestUseCase for CreateGuestUseCase<U> {
    async fn execute(&self, request: CreateGuestRequest) -> Result<Guest, CreateGuestError> {
        let email = request.email.trim().to_string();
        if !EmailAddress::is_valid(&email) {
            return Err(CreateGuestError::InvalidEmail);
        }

        let full_name = request.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(CreateGuestError::MissingName);
        }

        let new_guest = NewGuest {
            email,
            full_name,
            is_invited: request.is_invited,
            is_admin: request.is_admin,
            qr_token: Self::generate_qr_token(),
            qr_alias: Self::normalize_alias(request.qr_alias),
            household_members: request.household_members,
            address_line: request.address_line,
            city: request.city,
            postal_code: request.postal_code,
            country: request.country,
            personal_note: request.personal_note,
        };

        let guest = self.users.insert_guest(new_guest).await.map_err(|e| match e {
            UserStoreError::Duplicate(field) => CreateGuestError::Duplicate(field),
            other => CreateGuestError::Repository(other.to_string()),
        })?;

        tracing::info!(guest_id = %guest.id, "guest added to roster");
        Ok(guest)
    }
}
