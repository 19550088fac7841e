pub mod admin;
pub mod auth;
pub mod email;
pub mod guestbook;
pub mod rsvp;
