pub mod jwt;
pub mod sea_orm_entity;
pub mod user_store_postgres;
