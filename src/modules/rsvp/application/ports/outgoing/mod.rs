pub mod rsvp_repository;

pub use rsvp_repository::{RsvpRepository, RsvpRepositoryError};
