pub mod rsvp_confirmation;
