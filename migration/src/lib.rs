pub use sea_orm_migration::prelude::*;

mod m20260815_000001_create_users_table;
mod m20260815_000002_create_rsvps_table;
mod m20260815_000003_create_email_jobs_table;
mod m20260815_000004_create_guestbook_messages_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_users_table::Migration),
            Box::new(m20260815_000002_create_rsvps_table::Migration),
            Box::new(m20260815_000003_create_email_jobs_table::Migration),
            Box::new(m20260815_000004_create_guestbook_messages_table::Migration),
        ]
    }
}
