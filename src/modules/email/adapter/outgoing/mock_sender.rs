use crate::email::application::ports::outgoing::email_sender::EmailSender;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Capturing sender for tests and local development without SMTP.
pub struct MockEmailSender {
    sent_emails: Arc<Mutex<Vec<(String, String, String)>>>,
    fail_with: Option<String>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self {
            sent_emails: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            sent_emails: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(error.to_string()),
        }
    }

    pub fn get_sent_emails(&self) -> Vec<(String, String, String)> {
        self.sent_emails.lock().unwrap().clone()
    }
}

impl Default for MockEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.sent_emails.lock().unwrap().push((
            to.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}
