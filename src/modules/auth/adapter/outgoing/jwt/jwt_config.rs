use std::env;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret_key: String,
    /// Session lifetime in seconds.
    pub session_expiry: i64,
}

impl SessionConfig {
    fn parse_expiry(key: &str, default: &str) -> i64 {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("Invalid {} value", key))
    }

    /// Load session-token configuration from environment variables.
    ///
    /// A missing or short secret is a fatal startup condition, never a
    /// per-request error.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let secret_key = env::var("SESSION_SECRET").expect("SESSION_SECRET must be set");

        // HS256 needs at least 32 bytes of key material
        if secret_key.len() < 32 {
            panic!("SESSION_SECRET must be at least 32 characters long for HS256");
        }

        let session_expiry = Self::parse_expiry("SESSION_EXPIRY_SECONDS", "7200");

        if session_expiry <= 0 || session_expiry > 86400 {
            panic!("SESSION_EXPIRY_SECONDS must be between 1 and 86400 seconds (24 hours)");
        }

        Self {
            secret_key,
            session_expiry,
        }
    }
}
