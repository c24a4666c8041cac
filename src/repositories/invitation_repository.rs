use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::models::invitations;
use crate::repositories::RepoResult;

#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub inviter_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Échoue en UniqueViolation si le code existe déjà
    async fn create(
        &self,
        invitation: NewInvitation,
        now: DateTime<Utc>,
    ) -> RepoResult<invitations::Model>;

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<invitations::Model>>;

    /// UPDATE ... SET used_at = now WHERE id = ? AND used_at IS NULL.
    /// None si aucune ligne n'a été modifiée (déjà consommée par quelqu'un d'autre).
    async fn consume_if_available(
        &self,
        id: Uuid,
        used_by_id: Uuid,
        used_at: DateTime<Utc>,
    ) -> RepoResult<Option<invitations::Model>>;
}

pub struct SeaOrmInvitationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmInvitationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvitationRepository for SeaOrmInvitationRepository {
    async fn create(
        &self,
        invitation: NewInvitation,
        now: DateTime<Utc>,
    ) -> RepoResult<invitations::Model> {
        let new_invitation = invitations::ActiveModel {
            id: Set(Uuid::new_v4()),
            inviter_id: Set(invitation.inviter_id),
            code: Set(invitation.code),
            used_by_id: Set(None),
            used_at: Set(None),
            expires_at: Set(invitation.expires_at),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(new_invitation.insert(self.db.as_ref()).await?)
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<invitations::Model>> {
        Ok(invitations::Entity::find()
            .filter(invitations::Column::Code.eq(code))
            .one(self.db.as_ref())
            .await?)
    }

    async fn consume_if_available(
        &self,
        id: Uuid,
        used_by_id: Uuid,
        used_at: DateTime<Utc>,
    ) -> RepoResult<Option<invitations::Model>> {
        let txn = self.db.begin().await?;

        let result = invitations::Entity::update_many()
            .col_expr(invitations::Column::UsedById, Expr::value(used_by_id))
            .col_expr(invitations::Column::UsedAt, Expr::value(used_at))
            .col_expr(invitations::Column::UpdatedAt, Expr::value(used_at))
            .filter(invitations::Column::Id.eq(id))
            .filter(invitations::Column::UsedAt.is_null())
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let consumed = invitations::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;

        Ok(consumed)
    }
}
