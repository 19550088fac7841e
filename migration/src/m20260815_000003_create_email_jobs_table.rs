use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmailJobs::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(EmailJobs::Template)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailJobs::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(EmailJobs::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(EmailJobs::LastError).text())
                    .col(ColumnDef::new(EmailJobs::LastAttemptAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(EmailJobs::SentAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(EmailJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Queue pass scans pending/retrying jobs oldest first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_email_jobs_queue
                ON email_jobs (status, created_at)
                WHERE status IN ('pending', 'retrying');
                "#,
            )
            .await?;

        // Send history reads newest first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_email_jobs_created_at
                ON email_jobs (created_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP INDEX IF EXISTS idx_email_jobs_queue;
                DROP INDEX IF EXISTS idx_email_jobs_created_at;
                "#,
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EmailJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmailJobs {
    Table,
    Id,
    UserId,
    Template,
    Status,
    Attempts,
    LastError,
    LastAttemptAt,
    SentAt,
    CreatedAt,
}
