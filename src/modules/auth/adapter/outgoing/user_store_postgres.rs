use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{Guest, HouseholdMember};
use crate::auth::application::ports::outgoing::{
    NewGuest, RosterCounts, UserQuery, UserRepository, UserStoreError,
};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity,
    Model as UserModel,
};

/// Guest roster backed by the users table; serves both the query and the
/// repository port.
#[derive(Clone, Debug)]
pub struct UserStorePostgres {
    db: Arc<DatabaseConnection>,
}

impl UserStorePostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_guest(model: UserModel) -> Guest {
        let household_members: Vec<HouseholdMember> =
            serde_json::from_value(model.household_members).unwrap_or_default();

        Guest {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            is_invited: model.is_invited,
            has_rsvped: model.has_rsvped,
            is_admin: model.is_admin,
            qr_token: model.qr_token,
            qr_alias: model.qr_alias,
            household_members,
            address_line: model.address_line,
            city: model.city,
            postal_code: model.postal_code,
            country: model.country,
            personal_note: model.personal_note,
            rsvp_id: model.rsvp_id,
            created_at: model.created_at.with_timezone(&chrono::Utc),
            updated_at: model.updated_at.with_timezone(&chrono::Utc),
        }
    }

    fn map_insert_error(e: sea_orm::DbErr) -> UserStoreError {
        let err_str = e.to_string().to_lowercase();
        if err_str.contains("23505")
            || err_str.contains("duplicate key")
            || err_str.contains("unique constraint")
        {
            let field = if err_str.contains("qr_alias") {
                "qr_alias"
            } else if err_str.contains("qr_token") {
                "qr_token"
            } else {
                "email"
            };
            return UserStoreError::Duplicate(field);
        }
        UserStoreError::Database(e.to_string())
    }
}

#[async_trait]
impl UserQuery for UserStorePostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Guest>, UserStoreError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(user.map(Self::map_to_guest))
    }

    async fn find_by_qr_token(&self, qr_token: &str) -> Result<Option<Guest>, UserStoreError> {
        let user = UserEntity::find()
            .filter(UserColumn::QrToken.eq(qr_token))
            .one(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(user.map(Self::map_to_guest))
    }

    async fn find_by_qr_alias(&self, qr_alias: &str) -> Result<Option<Guest>, UserStoreError> {
        let user = UserEntity::find()
            .filter(UserColumn::QrAlias.eq(qr_alias))
            .one(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(user.map(Self::map_to_guest))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>, UserStoreError> {
        let user = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(user.map(Self::map_to_guest))
    }
}

#[async_trait]
impl UserRepository for UserStorePostgres {
    async fn insert_guest(&self, guest: NewGuest) -> Result<Guest, UserStoreError> {
        let household_members = serde_json::to_value(&guest.household_members)
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        let active_user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(guest.email),
            full_name: Set(guest.full_name),
            is_invited: Set(guest.is_invited),
            has_rsvped: Set(false),
            is_admin: Set(guest.is_admin),
            qr_token: Set(guest.qr_token),
            qr_alias: Set(guest.qr_alias),
            household_members: Set(household_members),
            address_line: Set(guest.address_line),
            city: Set(guest.city),
            postal_code: Set(guest.postal_code),
            country: Set(guest.country),
            personal_note: Set(guest.personal_note),
            rsvp_id: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active_user
            .insert(&*self.db)
            .await
            .map_err(Self::map_insert_error)?;

        Ok(Self::map_to_guest(inserted))
    }

    async fn mark_rsvped(
        &self,
        user_id: Uuid,
        rsvp_id: Option<Uuid>,
    ) -> Result<(), UserStoreError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?
            .ok_or(UserStoreError::NotFound)?;

        let mut active_user: UserActiveModel = user.into();
        active_user.has_rsvped = Set(true);
        if let Some(rsvp_id) = rsvp_id {
            active_user.rsvp_id = Set(Some(rsvp_id));
        }

        active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_guests(&self) -> Result<Vec<Guest>, UserStoreError> {
        let users = UserEntity::find()
            .order_by_asc(UserColumn::FullName)
            .all(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(users.into_iter().map(Self::map_to_guest).collect())
    }

    async fn list_pending_invitees(&self) -> Result<Vec<Guest>, UserStoreError> {
        let users = UserEntity::find()
            .filter(UserColumn::IsInvited.eq(true))
            .filter(UserColumn::HasRsvped.eq(false))
            .order_by_asc(UserColumn::FullName)
            .all(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(users.into_iter().map(Self::map_to_guest).collect())
    }

    async fn roster_counts(&self) -> Result<RosterCounts, UserStoreError> {
        let invited = UserEntity::find()
            .filter(UserColumn::IsInvited.eq(true))
            .count(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        let responded = UserEntity::find()
            .filter(UserColumn::HasRsvped.eq(true))
            .count(&*self.db)
            .await
            .map_err(|e| UserStoreError::Database(e.to_string()))?;

        Ok(RosterCounts { invited, responded })
    }
}
