pub mod rsvps;
