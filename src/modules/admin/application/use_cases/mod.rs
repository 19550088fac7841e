pub mod create_guest;
pub mod export_guests;
pub mod list_guests;
pub mod rsvp_stats;
pub mod send_reminder;
