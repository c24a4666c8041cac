use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::models::users::{self, AuthProvider};
use crate::repositories::RepoResult;

/// Données d'un user créé au premier login
#[derive(Debug, Clone)]
pub struct NewUser {
    pub provider: AuthProvider,
    pub provider_id: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

/// Patch appliqué champ par champ : None = inchangé
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub is_email_agreed: Option<bool>,
    pub is_push_agreed: Option<bool>,
    pub push_token: Option<String>,
    /// (handle tel que saisi, handle normalisé)
    pub handle: Option<(String, String)>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<users::Model>>;

    async fn find_by_provider(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> RepoResult<Option<users::Model>>;

    async fn find_by_handle(&self, handle_normalized: &str) -> RepoResult<Option<users::Model>>;

    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<users::Model>>;

    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepoResult<users::Model>;

    /// None si l'utilisateur n'existe pas
    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<users::Model>>;
}

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn find_by_provider(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> RepoResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Provider.eq(provider))
            .filter(users::Column::ProviderId.eq(provider_id))
            .one(self.db.as_ref())
            .await?)
    }

    async fn find_by_handle(&self, handle_normalized: &str) -> RepoResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::HandleNormalized.eq(handle_normalized))
            .one(self.db.as_ref())
            .await?)
    }

    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<users::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await?)
    }

    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepoResult<users::Model> {
        let new_user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider: Set(user.provider),
            provider_id: Set(user.provider_id),
            email: Set(user.email),
            name: Set(user.name),
            handle: Set(None),
            handle_normalized: Set(None),
            profile_image: Set(user.profile_image),
            phone_number: Set(user.phone_number),
            is_email_agreed: Set(false),
            is_push_agreed: Set(false),
            push_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(new_user.insert(self.db.as_ref()).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<users::Model>> {
        let Some(user) = users::Entity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let mut active_model: users::ActiveModel = user.into();
        if let Some(name) = changes.name {
            active_model.name = Set(Some(name));
        }
        if let Some(phone_number) = changes.phone_number {
            active_model.phone_number = Set(Some(phone_number));
        }
        if let Some(profile_image) = changes.profile_image {
            active_model.profile_image = Set(Some(profile_image));
        }
        if let Some(agreed) = changes.is_email_agreed {
            active_model.is_email_agreed = Set(agreed);
        }
        if let Some(agreed) = changes.is_push_agreed {
            active_model.is_push_agreed = Set(agreed);
        }
        if let Some(push_token) = changes.push_token {
            active_model.push_token = Set(Some(push_token));
        }
        if let Some((handle, normalized)) = changes.handle {
            active_model.handle = Set(Some(handle));
            active_model.handle_normalized = Set(Some(normalized));
        }
        active_model.updated_at = Set(now);

        Ok(Some(active_model.update(self.db.as_ref()).await?))
    }
}
