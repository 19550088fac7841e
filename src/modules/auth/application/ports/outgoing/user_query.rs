use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::Guest;

use super::user_repository::UserStoreError;

/// Read-side port over the guest roster.
#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Guest>, UserStoreError>;

    /// Exact, case-sensitive match on the canonical QR token.
    async fn find_by_qr_token(&self, qr_token: &str) -> Result<Option<Guest>, UserStoreError>;

    /// Match on the human-readable alias. Callers pass the alias already
    /// normalized (trimmed, lowercased); aliases are stored lowercase.
    async fn find_by_qr_alias(&self, qr_alias: &str) -> Result<Option<Guest>, UserStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>, UserStoreError>;
}
