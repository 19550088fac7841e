use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuestbookMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuestbookMessages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GuestbookMessages::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(GuestbookMessages::AuthorName)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GuestbookMessages::Message).text().not_null())
                    // New messages await moderation before guests see them
                    .col(
                        ColumnDef::new(GuestbookMessages::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GuestbookMessages::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GuestbookMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GuestbookMessages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guestbook_messages_user_id")
                            .from(GuestbookMessages::Table, GuestbookMessages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_guestbook_messages_created_at
                ON guestbook_messages (created_at DESC);
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER update_guestbook_messages_updated_at
                BEFORE UPDATE ON guestbook_messages
                FOR EACH ROW
                EXECUTE FUNCTION update_updated_at_column();
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
                DROP TRIGGER IF EXISTS update_guestbook_messages_updated_at ON guestbook_messages;
                DROP INDEX IF EXISTS idx_guestbook_messages_created_at;
                "#,
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(GuestbookMessages::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum GuestbookMessages {
    Table,
    Id,
    UserId,
    AuthorName,
    Message,
    IsApproved,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
