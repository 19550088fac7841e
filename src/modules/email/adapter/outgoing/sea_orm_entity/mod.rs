pub mod email_jobs;
