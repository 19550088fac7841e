use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::auth::application::domain::entities::Guest;
use crate::modules::auth::application::ports::outgoing::user_repository::UserRepository;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListGuestsError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IListGuestsUseCase: Send + Sync {
    async fn execute(&self) -> Result<Vec<Guest>, ListGuestsError>;
}

pub struct ListGuestsUseCase<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> ListGuestsUseCase<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U: UserRepository> IListGuestsUseCase for ListGuestsUseCase<U> {
    async fn execute(&self) -> Result<Vec<Guest>, ListGuestsError> {
        self.users
            .list_guests()
            .await
            .map_err(|e| ListGuestsError::Repository(e.to_string()))
    }
}
