// ============================================================================
// MODÈLE : INVITATIONS
// ============================================================================
//
// Workflow:
//   1. POST /invitations → code 8 caractères hex MAJUSCULES, expire à +7 jours
//   2. Un autre user appelle POST /invitations/consume/{code}
//   3. La relation d'amitié passe (ou est créée) en ACCEPTED
//   4. used_at passe de NULL à now par un UPDATE conditionnel
//      (WHERE used_at IS NULL), un seul gagnant possible
//
// Points d'attention:
//   - used_at != NULL est terminal, la ligne n'est plus jamais modifiée
//   - "expiré" n'est pas stocké, c'est expires_at < now
//
// ============================================================================

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub inviter_id: Uuid,

    #[sea_orm(unique)]
    pub code: String,

    pub used_by_id: Option<Uuid>,

    pub used_at: Option<DateTimeUtc>,

    pub expires_at: DateTimeUtc,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        self.expires_at < now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::InviterId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Inviter,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UsedById",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    UsedBy,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inviter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
