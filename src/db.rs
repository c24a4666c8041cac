// connexion BD + création du schéma au démarrage

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::debug;

use crate::models::{friendships, invitations, letters, notes, refresh_tokens, users};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Crée les tables manquantes (IF NOT EXISTS), dans l'ordre des clés étrangères
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, refresh_tokens::Entity).await?;
    create_table(db, friendships::Entity).await?;
    create_table(db, invitations::Entity).await?;
    create_table(db, letters::Entity).await?;
    create_table(db, notes::Entity).await?;

    let backend = db.get_database_backend();
    db.execute(backend.build(&provider_identity_index())).await?;

    debug!("schema synchronized");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Une identité provider ne correspond qu'à un seul user
fn provider_identity_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_users_provider_identity")
        .table(users::Entity)
        .col(users::Column::Provider)
        .col(users::Column::ProviderId)
        .unique()
        .if_not_exists()
        .to_owned()
}
