use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::models::refresh_tokens;
use crate::repositories::RepoResult;

#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(
        &self,
        token: NewRefreshToken,
        now: DateTime<Utc>,
    ) -> RepoResult<refresh_tokens::Model>;

    async fn find(&self, token: &str) -> RepoResult<Option<refresh_tokens::Model>>;

    /// true si une ligne a été supprimée
    async fn delete(&self, token: &str) -> RepoResult<bool>;
}

pub struct SeaOrmRefreshTokenRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRefreshTokenRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenRepository for SeaOrmRefreshTokenRepository {
    async fn create(
        &self,
        token: NewRefreshToken,
        now: DateTime<Utc>,
    ) -> RepoResult<refresh_tokens::Model> {
        let new_token = refresh_tokens::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token.token),
            user_id: Set(token.user_id),
            expires_at: Set(token.expires_at),
            created_at: Set(now),
        };

        Ok(new_token.insert(self.db.as_ref()).await?)
    }

    async fn find(&self, token: &str) -> RepoResult<Option<refresh_tokens::Model>> {
        Ok(refresh_tokens::Entity::find()
            .filter(refresh_tokens::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await?)
    }

    async fn delete(&self, token: &str) -> RepoResult<bool> {
        let result = refresh_tokens::Entity::delete_many()
            .filter(refresh_tokens::Column::Token.eq(token))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_delete_reports_missing_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
                MockExecResult { last_insert_id: 0, rows_affected: 0 },
            ])
            .into_connection();
        let repo = SeaOrmRefreshTokenRepository::new(Arc::new(db));

        assert!(repo.delete("token-1").await.unwrap());
        assert!(!repo.delete("token-1").await.unwrap());
    }
}
