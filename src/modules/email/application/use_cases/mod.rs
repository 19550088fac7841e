pub mod email_history;
pub mod enqueue_email;
pub mod process_email_queue;
