pub mod guestbook_repository;

pub use guestbook_repository::{
    GuestbookRepository, GuestbookRepositoryError, NewGuestbookMessage,
};
