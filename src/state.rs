// ============================================================================
// ASSEMBLAGE
// ============================================================================
//
// Construit les services à partir des repositories, dans l'ordre :
//   users → auth → friends → invitations / letters → notes
//
// AppState est cloné par worker actix (web::Data), tout est derrière des Arc.
//
// ============================================================================

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repositories::{
    FriendRepository, InvitationRepository, LetterRepository, NoteRepository,
    RefreshTokenRepository, SeaOrmFriendRepository, SeaOrmInvitationRepository,
    SeaOrmLetterRepository, SeaOrmNoteRepository, SeaOrmRefreshTokenRepository,
    SeaOrmUserRepository, UserRepository,
};
use crate::services::{
    AuthService, FriendService, InvitationService, LetterService, NoteService, UserService,
};
use crate::utils::clock::Clock;
use crate::utils::jwt::JwtIssuer;
use crate::utils::token_verifier::IdentityVerifier;

pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn RefreshTokenRepository>,
    pub friends: Arc<dyn FriendRepository>,
    pub invitations: Arc<dyn InvitationRepository>,
    pub letters: Arc<dyn LetterRepository>,
    pub notes: Arc<dyn NoteRepository>,
}

impl Repositories {
    pub fn sea_orm(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            tokens: Arc::new(SeaOrmRefreshTokenRepository::new(db.clone())),
            friends: Arc::new(SeaOrmFriendRepository::new(db.clone())),
            invitations: Arc::new(SeaOrmInvitationRepository::new(db.clone())),
            letters: Arc::new(SeaOrmLetterRepository::new(db.clone())),
            notes: Arc::new(SeaOrmNoteRepository::new(db)),
        }
    }

    #[cfg(test)]
    pub fn memory(store: Arc<crate::repositories::memory::MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            tokens: store.clone(),
            friends: store.clone(),
            invitations: store.clone(),
            letters: store.clone(),
            notes: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtIssuer>,
    pub auth: AuthService,
    pub users: UserService,
    pub friends: FriendService,
    pub invitations: InvitationService,
    pub letters: LetterService,
    pub notes: NoteService,
}

impl AppState {
    pub fn assemble(
        repos: Repositories,
        jwt: JwtIssuer,
        verifier: Arc<dyn IdentityVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let jwt = Arc::new(jwt);

        let users = UserService::new(repos.users.clone(), clock.clone());
        let auth = AuthService::new(
            users.clone(),
            repos.tokens,
            verifier,
            jwt.clone(),
            clock.clone(),
        );
        let friends = FriendService::new(repos.friends.clone(), repos.users, clock.clone());
        let invitations =
            InvitationService::new(repos.invitations, repos.friends.clone(), clock.clone());
        let letters = LetterService::new(repos.letters, repos.friends, clock.clone());
        let notes = NoteService::new(repos.notes, clock);

        Self {
            jwt,
            auth,
            users,
            friends,
            invitations,
            letters,
            notes,
        }
    }
}
