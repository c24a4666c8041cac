use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::notes;
use crate::repositories::RepoResult;

#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create(&self, note: NewNote, now: DateTime<Utc>) -> RepoResult<notes::Model>;

    async fn find_all_by_user(&self, user_id: Uuid) -> RepoResult<Vec<notes::Model>>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<notes::Model>>;

    async fn update(
        &self,
        id: Uuid,
        changes: NoteChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<notes::Model>>;

    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

pub struct SeaOrmNoteRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmNoteRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteRepository for SeaOrmNoteRepository {
    async fn create(&self, note: NewNote, now: DateTime<Utc>) -> RepoResult<notes::Model> {
        let new_note = notes::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(note.user_id),
            title: Set(note.title),
            content: Set(note.content),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(new_note.insert(self.db.as_ref()).await?)
    }

    async fn find_all_by_user(&self, user_id: Uuid) -> RepoResult<Vec<notes::Model>> {
        Ok(notes::Entity::find()
            .filter(notes::Column::UserId.eq(user_id))
            .order_by_desc(notes::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<notes::Model>> {
        Ok(notes::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: NoteChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<notes::Model>> {
        let Some(note) = notes::Entity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let mut active_model: notes::ActiveModel = note.into();
        if let Some(title) = changes.title {
            active_model.title = Set(Some(title));
        }
        if let Some(content) = changes.content {
            active_model.content = Set(content);
        }
        active_model.updated_at = Set(now);

        Ok(Some(active_model.update(self.db.as_ref()).await?))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        notes::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }
}
