pub mod email_job_repository;
pub mod email_sender;

pub use email_job_repository::{EmailJobRepository, EmailJobRepositoryError, NewEmailJob};
pub use email_sender::EmailSender;
