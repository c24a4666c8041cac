use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::friendships::{self, FriendshipStatus, pair_key};
use crate::repositories::RepoResult;

#[derive(Debug, Clone)]
pub struct NewFriendship {
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: FriendshipStatus,
}

#[async_trait]
pub trait FriendRepository: Send + Sync {
    /// Échoue en UniqueViolation si la paire existe déjà (dans un sens ou l'autre)
    async fn create(
        &self,
        friendship: NewFriendship,
        now: DateTime<Utc>,
    ) -> RepoResult<friendships::Model>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<friendships::Model>>;

    /// Relation entre deux users, quel que soit le sens
    async fn find_between(&self, a: Uuid, b: Uuid) -> RepoResult<Option<friendships::Model>>;

    async fn find_for_user(
        &self,
        user_id: Uuid,
        status: FriendshipStatus,
    ) -> RepoResult<Vec<friendships::Model>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<friendships::Model>>;

    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

pub struct SeaOrmFriendRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmFriendRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FriendRepository for SeaOrmFriendRepository {
    async fn create(
        &self,
        friendship: NewFriendship,
        now: DateTime<Utc>,
    ) -> RepoResult<friendships::Model> {
        let new_friendship = friendships::ActiveModel {
            id: Set(Uuid::new_v4()),
            requester_id: Set(friendship.requester_id),
            addressee_id: Set(friendship.addressee_id),
            pair_key: Set(pair_key(friendship.requester_id, friendship.addressee_id)),
            status: Set(friendship.status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(new_friendship.insert(self.db.as_ref()).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<friendships::Model>> {
        Ok(friendships::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn find_between(&self, a: Uuid, b: Uuid) -> RepoResult<Option<friendships::Model>> {
        Ok(friendships::Entity::find()
            .filter(friendships::Column::PairKey.eq(pair_key(a, b)))
            .one(self.db.as_ref())
            .await?)
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        status: FriendshipStatus,
    ) -> RepoResult<Vec<friendships::Model>> {
        Ok(friendships::Entity::find()
            .filter(friendships::Column::Status.eq(status))
            .filter(
                Condition::any()
                    .add(friendships::Column::RequesterId.eq(user_id))
                    .add(friendships::Column::AddresseeId.eq(user_id)),
            )
            .order_by_desc(friendships::Column::UpdatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<friendships::Model>> {
        let Some(friendship) = friendships::Entity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let mut active_model: friendships::ActiveModel = friendship.into();
        active_model.status = Set(status);
        active_model.updated_at = Set(now);

        Ok(Some(active_model.update(self.db.as_ref()).await?))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        friendships::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }
}
