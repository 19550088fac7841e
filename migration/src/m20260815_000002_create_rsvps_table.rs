use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rsvps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rsvps::Id).uuid().not_null().primary_key())
                    // One RSVP per guest, enforced here rather than in code
                    .col(
                        ColumnDef::new(Rsvps::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Rsvps::Attendance).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Rsvps::GuestCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rsvps::Guests)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Rsvps::Notes).text())
                    .col(
                        ColumnDef::new(Rsvps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Rsvps::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rsvps_user_id")
                            .from(Rsvps::Table, Rsvps::UserId)
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
                CREATE TRIGGER update_rsvps_updated_at
                BEFORE UPDATE ON rsvps
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
            .execute_unprepared("DROP TRIGGER IF EXISTS update_rsvps_updated_at ON rsvps")
            .await?;

        manager
            .drop_table(Table::drop().table(Rsvps::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rsvps {
    Table,
    Id,
    UserId,
    Attendance,
    GuestCount,
    Guests,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
