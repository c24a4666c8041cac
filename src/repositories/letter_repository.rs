use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::letters;
use crate::repositories::RepoResult;

#[derive(Debug, Clone)]
pub struct NewLetter {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub deliver_at: DateTime<Utc>,
}

#[async_trait]
pub trait LetterRepository: Send + Sync {
    async fn create(&self, letter: NewLetter, now: DateTime<Utc>) -> RepoResult<letters::Model>;

    /// Lettres reçues avec deliver_at <= now, deliver_at décroissant
    async fn find_inbox(
        &self,
        recipient_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<letters::Model>>;

    async fn find_sent(&self, sender_id: Uuid) -> RepoResult<Vec<letters::Model>>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<letters::Model>>;
}

pub struct SeaOrmLetterRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmLetterRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LetterRepository for SeaOrmLetterRepository {
    async fn create(&self, letter: NewLetter, now: DateTime<Utc>) -> RepoResult<letters::Model> {
        let new_letter = letters::ActiveModel {
            id: Set(Uuid::new_v4()),
            sender_id: Set(letter.sender_id),
            recipient_id: Set(letter.recipient_id),
            content: Set(letter.content),
            deliver_at: Set(letter.deliver_at),
            read_at: Set(None),
            created_at: Set(now),
        };

        Ok(new_letter.insert(self.db.as_ref()).await?)
    }

    async fn find_inbox(
        &self,
        recipient_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<letters::Model>> {
        Ok(letters::Entity::find()
            .filter(letters::Column::RecipientId.eq(recipient_id))
            .filter(letters::Column::DeliverAt.lte(now))
            .order_by_desc(letters::Column::DeliverAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_sent(&self, sender_id: Uuid) -> RepoResult<Vec<letters::Model>> {
        Ok(letters::Entity::find()
            .filter(letters::Column::SenderId.eq(sender_id))
            .order_by_desc(letters::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<letters::Model>> {
        Ok(letters::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }
}
