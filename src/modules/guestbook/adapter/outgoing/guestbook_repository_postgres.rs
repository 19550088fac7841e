use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::guestbook::application::domain::message::GuestbookMessage;
use crate::guestbook::application::ports::outgoing::{
    GuestbookRepository, GuestbookRepositoryError, NewGuestbookMessage,
};

use super::sea_orm_entity::guestbook_messages::{
    ActiveModel as MessageActiveModel, Column as MessageColumn, Entity as MessageEntity,
    Model as MessageModel,
};

#[derive(Clone, Debug)]
pub struct GuestbookRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl GuestbookRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_to_message(model: MessageModel) -> GuestbookMessage {
        GuestbookMessage {
            id: model.id,
            user_id: model.user_id,
            author_name: model.author_name,
            message: model.message,
            is_approved: model.is_approved,
            is_visible: model.is_visible,
            created_at: model.created_at.with_timezone(&chrono::Utc),
            updated_at: model.updated_at.with_timezone(&chrono::Utc),
        }
    }
}

#[async_trait]
impl GuestbookRepository for GuestbookRepositoryPostgres {
    async fn insert(
        &self,
        message: NewGuestbookMessage,
    ) -> Result<GuestbookMessage, GuestbookRepositoryError> {
        let active_message = MessageActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(message.user_id),
            author_name: Set(message.author_name),
            message: Set(message.message),
            is_approved: Set(false),
            is_visible: Set(true),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active_message
            .insert(&*self.db)
            .await
            .map_err(|e| GuestbookRepositoryError::Database(e.to_string()))?;

        Ok(Self::map_to_message(inserted))
    }

    async fn list(
        &self,
        include_hidden: bool,
    ) -> Result<Vec<GuestbookMessage>, GuestbookRepositoryError> {
        let mut query = MessageEntity::find().order_by_desc(MessageColumn::CreatedAt);

        if !include_hidden {
            query = query
                .filter(MessageColumn::IsApproved.eq(true))
                .filter(MessageColumn::IsVisible.eq(true));
        }

        let rows = query
            .all(&*self.db)
            .await
            .map_err(|e| GuestbookRepositoryError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Self::map_to_message).collect())
    }

    async fn set_moderation(
        &self,
        message_id: Uuid,
        approved: bool,
        visible: bool,
    ) -> Result<GuestbookMessage, GuestbookRepositoryError> {
        let row = MessageEntity::find_by_id(message_id)
            .one(&*self.db)
            .await
            .map_err(|e| GuestbookRepositoryError::Database(e.to_string()))?
            .ok_or(GuestbookRepositoryError::NotFound)?;

        let mut active_message: MessageActiveModel = row.into();
        active_message.is_approved = Set(approved);
        active_message.is_visible = Set(visible);
        active_message.updated_at = Set(chrono::Utc::now().into());

        let updated = active_message
            .update(&*self.db)
            .await
            .map_err(|e| GuestbookRepositoryError::Database(e.to_string()))?;

        Ok(Self::map_to_message(updated))
    }
}
