use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::ports::outgoing::user_repository::UserRepository;
use crate::modules::rsvp::application::domain::rsvp::Rsvp;
use crate::modules::rsvp::application::ports::outgoing::RsvpRepository;

const CSV_HEADER: &str = "full_name,email,is_invited,has_rsvped,attendance,guest_count";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportGuestsError {
    #[error("Database error: {0}")]
    Repository(String),
}

#[async_trait]
pub trait IExportGuestsUseCase: Send + Sync {
    /// Full roster joined with RSVP state, as CSV text.
    async fn execute(&self) -> Result<String, ExportGuestsError>;
}

pub struct ExportGuestsUseCase<U, R>
where
    U: UserRepository,
    R: RsvpRepository,
{
    users: Arc<U>,
    rsvps: Arc<R>,
}

impl<U, R> ExportGuestsUseCase<U, R>
where
    U: UserRepository,
    R: RsvpRepository,
{
    pub fn new(users: Arc<U>, rsvps: Arc<R>) -> Self {
        Self { users, rsvps }
    }
}

/// RFC 4180 quoting: wrap fields containing commas, quotes, or newlines.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[async_trait]
impl<U, R> IExportGuestsUseCase for ExportGuestsUseCase<U, R>
where
    U: UserRepository,
    R: RsvpRepository,
{
    async fn execute(&self) -> Result<String, ExportGuestsError> {
        let guests = self
            .users
            .list_guests()
            .await
            .map_err(|e| ExportGuestsError::Repository(e.to_string()))?;

        let rsvps: HashMap<Uuid, Rsvp> = self
            .rsvps
            .find_all()
            .await
            .map_err(|e| ExportGuestsError::Repository(e.to_string()))?
            .into_iter()
            .map(|rsvp| (rsvp.user_id, rsvp))
            .collect();

        let mut out = String::from(CSV_HEADER);
        out.push('\n');

        for guest in guests {
            let rsvp = rsvps.get(&guest.id);
            let attendance = rsvp.map(|r| r.attendance.as_str()).unwrap_or("");
            let guest_count = rsvp.map(|r| r.guest_count.to_string()).unwrap_or_default();

            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                csv_field(&guest.full_name),
                csv_field(&guest.email),
                guest.is_invited,
                guest.has_rsvped,
                attendance,
                guest_count,
            ));
        }

        Ok(out)
    }
}
