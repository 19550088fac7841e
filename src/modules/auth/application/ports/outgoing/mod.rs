pub mod token_provider;
pub mod user_query;
pub mod user_repository;

pub use token_provider::{SessionClaims, TokenError, TokenProvider};
pub use user_query::UserQuery;
pub use user_repository::{NewGuest, RosterCounts, UserRepository, UserStoreError};
