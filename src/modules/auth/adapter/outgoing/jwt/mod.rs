pub mod jwt_config;
pub mod jwt_service;

pub use jwt_config::SessionConfig;
pub use jwt_service::JwtSessionService;
