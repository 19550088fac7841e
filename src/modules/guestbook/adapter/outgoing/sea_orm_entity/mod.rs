pub mod guestbook_messages;
