use async_trait::async_trait;

/// Delivery port. Implementations return a human-readable error string;
/// the queue records it verbatim on the job.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String>;
}
