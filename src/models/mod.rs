// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - users : Utilisateurs (login OAuth Apple / Google, handle)
//   - refresh_tokens : Refresh tokens (rotation, expire 7 jours)
//   - friendships : Relations d'amitié (PENDING / ACCEPTED)
//   - invitations : Codes d'invitation à usage unique (expire 7 jours)
//   - letters : Lettres différées (visibles à partir de deliver_at)
//   - notes : Notes privées
//   - dto : Data Transfer Objects pour les requêtes / réponses API
//
// Points d'attention:
//   - Tous les ids sont des UUID v4, toutes les dates sont en UTC
//   - Les tables sont créées au démarrage si absentes (db::sync_schema)
//
// ============================================================================

pub mod dto;
pub mod friendships;
pub mod invitations;
pub mod letters;
pub mod notes;
pub mod refresh_tokens;
pub mod users;
