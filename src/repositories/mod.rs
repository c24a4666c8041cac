// ============================================================================
// REPOSITORIES
// ============================================================================
//
// Un trait par agrégat + une implémentation SeaORM. Les services ne voient
// que les traits (Arc<dyn ...>), ce qui permet de les tester sur le store
// mémoire (module memory, tests uniquement).
//
// Points d'attention:
//   - Une violation de contrainte UNIQUE remonte en RepoError::UniqueViolation,
//     c'est le signal "course perdue" interprété par les services
//   - Toute autre DbErr remonte telle quelle (RepoError::Db)
//
// ============================================================================

pub mod friend_repository;
pub mod invitation_repository;
pub mod letter_repository;
pub mod note_repository;
pub mod token_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub use friend_repository::{FriendRepository, NewFriendship, SeaOrmFriendRepository};
pub use invitation_repository::{InvitationRepository, NewInvitation, SeaOrmInvitationRepository};
pub use letter_repository::{LetterRepository, NewLetter, SeaOrmLetterRepository};
pub use note_repository::{NewNote, NoteChanges, NoteRepository, SeaOrmNoteRepository};
pub use token_repository::{NewRefreshToken, RefreshTokenRepository, SeaOrmRefreshTokenRepository};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserChanges, UserRepository};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Db(DbErr),
}

impl RepoError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, RepoError::UniqueViolation(_))
    }
}

impl From<DbErr> for RepoError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::UniqueViolation(detail),
            _ => RepoError::Db(err),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
