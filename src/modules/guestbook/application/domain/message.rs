use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::sanitize::sanitize_text;

pub const MAX_MESSAGE_LEN: usize = 1000;

/// A guestbook entry. New messages start unapproved but visible, so a
/// moderator can publish with one flag flip or pull a message without
/// deleting it.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestbookMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub message: String,
    pub is_approved: bool,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuestbookMessage {
    /// Published entries are the ones guests see.
    pub fn is_published(&self) -> bool {
        self.is_approved && self.is_visible
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageValidationError {
    #[error("Message cannot be empty")]
    Empty,
}

/// Sanitized message body, capped at [`MAX_MESSAGE_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(raw: &str) -> Result<Self, MessageValidationError> {
        let cleaned = sanitize_text(raw, MAX_MESSAGE_LEN);
        if cleaned.is_empty() {
            return Err(MessageValidationError::Empty);
        }
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_passes_through() {
        let body = MessageBody::new("Congratulations to you both!").unwrap();
        assert_eq!(body.as_str(), "Congratulations to you both!");
    }

    #[test]
    fn markup_is_stripped() {
        let body = MessageBody::new("<script>alert(1)</script>So happy for you").unwrap();
        assert_eq!(body.as_str(), "alert(1)So happy for you");
    }

    #[test]
    fn empty_after_sanitizing_is_rejected() {
        assert_eq!(
            MessageBody::new("   <br/>  ").unwrap_err(),
            MessageValidationError::Empty
        );
        assert_eq!(MessageBody::new("").unwrap_err(), MessageValidationError::Empty);
    }

    #[test]
    fn long_message_is_truncated() {
        let body = MessageBody::new(&"x".repeat(5000)).unwrap();
        assert_eq!(body.as_str().len(), MAX_MESSAGE_LEN);
    }
}
