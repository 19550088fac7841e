use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::rsvp::application::domain::rsvp::{Attendance, Rsvp, RsvpGuest, RsvpSubmission};
use crate::rsvp::application::ports::outgoing::{RsvpRepository, RsvpRepositoryError};

use super::sea_orm_entity::rsvps::{
    ActiveModel as RsvpActiveModel, Column as RsvpColumn, Entity as RsvpEntity, Model as RsvpModel,
};

#[derive(Clone, Debug)]
pub struct RsvpRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl RsvpRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_rsvp(model: RsvpModel) -> Result<Rsvp, RsvpRepositoryError> {
        let attendance = Attendance::parse(&model.attendance).ok_or_else(|| {
            RsvpRepositoryError::Database(format!(
                "corrupt attendance value in row {}: {}",
                model.id, model.attendance
            ))
        })?;
        let guests: Vec<RsvpGuest> = serde_json::from_value(model.guests)
            .map_err(|e| RsvpRepositoryError::Database(e.to_string()))?;

        Ok(Rsvp {
            id: model.id,
            user_id: model.user_id,
            attendance,
            guest_count: model.guest_count,
            guests,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&chrono::Utc),
            updated_at: model.updated_at.with_timezone(&chrono::Utc),
        })
    }

    fn guests_json(submission: &RsvpSubmission) -> Result<serde_json::Value, RsvpRepositoryError> {
        serde_json::to_value(submission.guests())
            .map_err(|e| RsvpRepositoryError::Database(e.to_string()))
    }

    fn map_insert_error(e: sea_orm::DbErr) -> RsvpRepositoryError {
        let err_str = e.to_string().to_lowercase();
        if err_str.contains("23505")
            || err_str.contains("duplicate key")
            || err_str.contains("unique constraint")
        {
            return RsvpRepositoryError::AlreadyExists;
        }
        RsvpRepositoryError::Database(e.to_string())
    }
}

#[async_trait]
impl RsvpRepository for RsvpRepositoryPostgres {
    async fn insert(
        &self,
        user_id: Uuid,
        submission: &RsvpSubmission,
    ) -> Result<Rsvp, RsvpRepositoryError> {
        let active_rsvp = RsvpActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            attendance: Set(submission.attendance().as_str().to_string()),
            guest_count: Set(submission.guest_count()),
            guests: Set(Self::guests_json(submission)?),
            notes: Set(submission.notes().map(str::to_string)),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active_rsvp
            .insert(&*self.db)
            .await
            .map_err(Self::map_insert_error)?;

        Self::map_to_rsvp(inserted)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Rsvp>, RsvpRepositoryError> {
        let row = RsvpEntity::find()
            .filter(RsvpColumn::UserId.eq(user_id))
            .one(&*self.db)
            .await
            .map_err(|e| RsvpRepositoryError::Database(e.to_string()))?;

        row.map(Self::map_to_rsvp).transpose()
    }

    async fn update_by_user(
        &self,
        user_id: Uuid,
        submission: &RsvpSubmission,
    ) -> Result<Rsvp, RsvpRepositoryError> {
        let row = RsvpEntity::find()
            .filter(RsvpColumn::UserId.eq(user_id))
            .one(&*self.db)
            .await
            .map_err(|e| RsvpRepositoryError::Database(e.to_string()))?
            .ok_or(RsvpRepositoryError::NotFound)?;

        let mut active_rsvp: RsvpActiveModel = row.into();
        active_rsvp.attendance = Set(submission.attendance().as_str().to_string());
        active_rsvp.guest_count = Set(submission.guest_count());
        active_rsvp.guests = Set(Self::guests_json(submission)?);
        active_rsvp.notes = Set(submission.notes().map(str::to_string));
        active_rsvp.updated_at = Set(Utc::now().into());

        let updated = active_rsvp
            .update(&*self.db)
            .await
            .map_err(|e| RsvpRepositoryError::Database(e.to_string()))?;

        Self::map_to_rsvp(updated)
    }

    async fn find_all(&self) -> Result<Vec<Rsvp>, RsvpRepositoryError> {
        let rows = RsvpEntity::find()
            .order_by_asc(RsvpColumn::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(|e| RsvpRepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_to_rsvp).collect()
    }
}
