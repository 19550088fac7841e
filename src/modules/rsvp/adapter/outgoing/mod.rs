pub mod rsvp_repository_postgres;
pub mod sea_orm_entity;
