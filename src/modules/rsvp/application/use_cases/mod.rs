pub mod create_rsvp;
pub mod edit_rsvp;
pub mod get_rsvp;
