use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub is_invited: bool,
    pub has_rsvped: bool,
    pub is_admin: bool,
    #[sea_orm(unique)]
    pub qr_token: String,
    pub qr_alias: Option<String>,
    pub household_members: Json,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub personal_note: Option<String>,
    pub rsvp_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        use chrono::Utc;
        use sea_orm::ActiveValue::Set;

        if !insert {
            self.updated_at = Set(Utc::now().into());
        }

        Ok(self)
    }
}
