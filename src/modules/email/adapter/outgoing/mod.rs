pub mod email_job_repository_postgres;
pub mod mock_sender;
pub mod sea_orm_entity;
pub mod smtp_sender;
