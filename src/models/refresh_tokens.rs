// ============================================================================
// MODÈLE : REFRESH TOKENS
// ============================================================================
//
// Workflow:
//   1. Login / refresh réussi → un nouveau token est inséré (expire à +7 jours)
//   2. POST /auth/refresh → le token présenté est SUPPRIMÉ puis une nouvelle
//      paire est émise (rotation, un token ne sert qu'une fois)
//   3. POST /auth/logout → suppression (idempotent)
//
// Points d'attention:
//   - expires_at == now est encore valide (borne inclusive)
//   - ON DELETE CASCADE vers users
//
// ============================================================================

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "refresh_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique, column_type = "Text")]
    pub token: String,

    pub user_id: Uuid,

    pub expires_at: DateTimeUtc,

    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        self.expires_at < now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
