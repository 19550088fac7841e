pub mod list_messages;
pub mod moderate_message;
pub mod post_message;
