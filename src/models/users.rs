// ============================================================================
// MODÈLE : USERS
// ============================================================================
//
// Colonnes de la table users:
//   - id (UUID, PRIMARY KEY)
//   - provider / provider_id : identité externe (UNIQUE sur la paire,
//     index créé au démarrage par db::sync_schema)
//   - email (UNIQUE, nullable)
//   - handle : tel que saisi par l'utilisateur
//   - handle_normalized (UNIQUE, nullable) : handle trim + lowercase
//   - consentements (is_email_agreed, is_push_agreed) + push_token
//
// Points d'attention:
//   - provider_id n'est JAMAIS renvoyé au client (voir dto::UserResponse)
//   - un user n'est jamais supprimé
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider: AuthProvider,
    pub provider_id: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub name: Option<String>,
    pub handle: Option<String>,
    #[sea_orm(unique)]
    pub handle_normalized: Option<String>,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub is_email_agreed: bool,
    pub is_push_agreed: bool,
    pub push_token: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Fournisseur d'identité utilisé au login
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    #[sea_orm(string_value = "GOOGLE")]
    Google,
    #[sea_orm(string_value = "APPLE")]
    Apple,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::refresh_tokens::Entity")]
    RefreshTokens,

    #[sea_orm(has_many = "super::invitations::Entity")]
    Invitations,

    #[sea_orm(has_many = "super::notes::Entity")]
    Notes,
}

impl Related<super::refresh_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RefreshTokens.def()
    }
}

impl Related<super::invitations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invitations.def()
    }
}

impl Related<super::notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
