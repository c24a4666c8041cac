// Store mémoire pour les tests des services : mêmes contraintes UNIQUE que
// le schéma Postgres, plus injection de pannes sur la prochaine écriture.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use uuid::Uuid;

use crate::models::friendships::{self, FriendshipStatus, pair_key};
use crate::models::users::{self, AuthProvider};
use crate::models::{invitations, letters, notes, refresh_tokens};
use crate::repositories::{
    FriendRepository, InvitationRepository, LetterRepository, NewFriendship, NewInvitation,
    NewLetter, NewNote, NewRefreshToken, NewUser, NoteChanges, NoteRepository,
    RefreshTokenRepository, RepoError, RepoResult, UserChanges, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<users::Model>,
    tokens: Vec<refresh_tokens::Model>,
    friendships: Vec<friendships::Model>,
    invitations: Vec<invitations::Model>,
    letters: Vec<letters::Model>,
    notes: Vec<notes::Model>,
}

#[derive(Default)]
struct Faults {
    unique_violations: usize,
    failure: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Les `count` prochaines écritures échouent en violation UNIQUE
    pub fn fail_with_unique_violations(&self, count: usize) {
        self.faults.lock().unwrap().unique_violations = count;
    }

    /// La prochaine écriture échoue avec DbErr::Custom(message)
    pub fn fail_next_write(&self, message: &str) {
        self.faults.lock().unwrap().failure = Some(message.to_string());
    }

    pub fn insert_user(&self, user: users::Model) {
        self.tables.lock().unwrap().users.push(user);
    }

    pub fn friendships(&self) -> Vec<friendships::Model> {
        self.tables.lock().unwrap().friendships.clone()
    }

    pub fn tokens(&self) -> Vec<refresh_tokens::Model> {
        self.tables.lock().unwrap().tokens.clone()
    }

    pub fn invitation(&self, code: &str) -> Option<invitations::Model> {
        self.tables
            .lock()
            .unwrap()
            .invitations
            .iter()
            .find(|i| i.code == code)
            .cloned()
    }

    /// Marque directement une invitation comme consommée (simule un
    /// concurrent qui a gagné la course)
    pub fn mark_invitation_used(&self, id: Uuid, used_by_id: Uuid, used_at: DateTime<Utc>) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(invitation) = tables.invitations.iter_mut().find(|i| i.id == id) {
            invitation.used_by_id = Some(used_by_id);
            invitation.used_at = Some(used_at);
        }
    }

    fn check_write(&self) -> RepoResult<()> {
        let mut faults = self.faults.lock().unwrap();
        if let Some(message) = faults.failure.take() {
            return Err(RepoError::Db(DbErr::Custom(message)));
        }
        if faults.unique_violations > 0 {
            faults.unique_violations -= 1;
            return Err(RepoError::UniqueViolation("injected".to_string()));
        }
        Ok(())
    }
}

fn unique(what: &str) -> RepoError {
    RepoError::UniqueViolation(what.to_string())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<users::Model>> {
        Ok(self.tables.lock().unwrap().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_provider(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> RepoResult<Option<users::Model>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.provider == provider && u.provider_id == provider_id)
            .cloned())
    }

    async fn find_by_handle(&self, handle_normalized: &str) -> RepoResult<Option<users::Model>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.handle_normalized.as_deref() == Some(handle_normalized))
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<users::Model>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepoResult<users::Model> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();

        if tables
            .users
            .iter()
            .any(|u| u.provider == user.provider && u.provider_id == user.provider_id)
        {
            return Err(unique("users_provider_identity"));
        }
        if user.email.is_some() && tables.users.iter().any(|u| u.email == user.email) {
            return Err(unique("users_email"));
        }

        let created = users::Model {
            id: Uuid::new_v4(),
            provider: user.provider,
            provider_id: user.provider_id,
            email: user.email,
            name: user.name,
            handle: None,
            handle_normalized: None,
            profile_image: user.profile_image,
            phone_number: user.phone_number,
            is_email_agreed: false,
            is_push_agreed: false,
            push_token: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<users::Model>> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();

        if let Some((_, normalized)) = &changes.handle {
            let taken = tables
                .users
                .iter()
                .any(|u| u.id != id && u.handle_normalized.as_ref() == Some(normalized));
            if taken {
                return Err(unique("users_handle_normalized"));
            }
        }

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = Some(name);
        }
        if let Some(phone_number) = changes.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(profile_image) = changes.profile_image {
            user.profile_image = Some(profile_image);
        }
        if let Some(agreed) = changes.is_email_agreed {
            user.is_email_agreed = agreed;
        }
        if let Some(agreed) = changes.is_push_agreed {
            user.is_push_agreed = agreed;
        }
        if let Some(push_token) = changes.push_token {
            user.push_token = Some(push_token);
        }
        if let Some((handle, normalized)) = changes.handle {
            user.handle = Some(handle);
            user.handle_normalized = Some(normalized);
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStore {
    async fn create(
        &self,
        token: NewRefreshToken,
        now: DateTime<Utc>,
    ) -> RepoResult<refresh_tokens::Model> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();

        if tables.tokens.iter().any(|t| t.token == token.token) {
            return Err(unique("refresh_tokens_token"));
        }

        let created = refresh_tokens::Model {
            id: Uuid::new_v4(),
            token: token.token,
            user_id: token.user_id,
            expires_at: token.expires_at,
            created_at: now,
        };
        tables.tokens.push(created.clone());
        Ok(created)
    }

    async fn find(&self, token: &str) -> RepoResult<Option<refresh_tokens::Model>> {
        Ok(self.tables.lock().unwrap().tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn delete(&self, token: &str) -> RepoResult<bool> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.tokens.len();
        tables.tokens.retain(|t| t.token != token);
        Ok(tables.tokens.len() < before)
    }
}

#[async_trait]
impl FriendRepository for MemoryStore {
    async fn create(
        &self,
        friendship: NewFriendship,
        now: DateTime<Utc>,
    ) -> RepoResult<friendships::Model> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();

        let key = pair_key(friendship.requester_id, friendship.addressee_id);
        if tables.friendships.iter().any(|f| f.pair_key == key) {
            return Err(unique("friendships_pair_key"));
        }

        let created = friendships::Model {
            id: Uuid::new_v4(),
            requester_id: friendship.requester_id,
            addressee_id: friendship.addressee_id,
            pair_key: key,
            status: friendship.status,
            created_at: now,
            updated_at: now,
        };
        tables.friendships.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<friendships::Model>> {
        Ok(self.tables.lock().unwrap().friendships.iter().find(|f| f.id == id).cloned())
    }

    async fn find_between(&self, a: Uuid, b: Uuid) -> RepoResult<Option<friendships::Model>> {
        let key = pair_key(a, b);
        Ok(self
            .tables
            .lock()
            .unwrap()
            .friendships
            .iter()
            .find(|f| f.pair_key == key)
            .cloned())
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        status: FriendshipStatus,
    ) -> RepoResult<Vec<friendships::Model>> {
        let mut found: Vec<_> = self
            .tables
            .lock()
            .unwrap()
            .friendships
            .iter()
            .filter(|f| f.status == status && f.involves(user_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<friendships::Model>> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(friendship) = tables.friendships.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        friendship.status = status;
        friendship.updated_at = now;
        Ok(Some(friendship.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.check_write()?;
        self.tables.lock().unwrap().friendships.retain(|f| f.id != id);
        Ok(())
    }
}

#[async_trait]
impl InvitationRepository for MemoryStore {
    async fn create(
        &self,
        invitation: NewInvitation,
        now: DateTime<Utc>,
    ) -> RepoResult<invitations::Model> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();

        if tables.invitations.iter().any(|i| i.code == invitation.code) {
            return Err(unique("invitations_code"));
        }

        let created = invitations::Model {
            id: Uuid::new_v4(),
            inviter_id: invitation.inviter_id,
            code: invitation.code,
            used_by_id: None,
            used_at: None,
            expires_at: invitation.expires_at,
            created_at: now,
            updated_at: now,
        };
        tables.invitations.push(created.clone());
        Ok(created)
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<invitations::Model>> {
        Ok(self.invitation(code))
    }

    async fn consume_if_available(
        &self,
        id: Uuid,
        used_by_id: Uuid,
        used_at: DateTime<Utc>,
    ) -> RepoResult<Option<invitations::Model>> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(invitation) = tables
            .invitations
            .iter_mut()
            .find(|i| i.id == id && i.used_at.is_none())
        else {
            return Ok(None);
        };
        invitation.used_by_id = Some(used_by_id);
        invitation.used_at = Some(used_at);
        invitation.updated_at = used_at;
        Ok(Some(invitation.clone()))
    }
}

#[async_trait]
impl LetterRepository for MemoryStore {
    async fn create(&self, letter: NewLetter, now: DateTime<Utc>) -> RepoResult<letters::Model> {
        self.check_write()?;
        let created = letters::Model {
            id: Uuid::new_v4(),
            sender_id: letter.sender_id,
            recipient_id: letter.recipient_id,
            content: letter.content,
            deliver_at: letter.deliver_at,
            read_at: None,
            created_at: now,
        };
        self.tables.lock().unwrap().letters.push(created.clone());
        Ok(created)
    }

    async fn find_inbox(
        &self,
        recipient_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<letters::Model>> {
        let mut found: Vec<_> = self
            .tables
            .lock()
            .unwrap()
            .letters
            .iter()
            .filter(|l| l.recipient_id == recipient_id && l.deliver_at <= now)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.deliver_at.cmp(&a.deliver_at));
        Ok(found)
    }

    async fn find_sent(&self, sender_id: Uuid) -> RepoResult<Vec<letters::Model>> {
        let mut found: Vec<_> = self
            .tables
            .lock()
            .unwrap()
            .letters
            .iter()
            .filter(|l| l.sender_id == sender_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<letters::Model>> {
        Ok(self.tables.lock().unwrap().letters.iter().find(|l| l.id == id).cloned())
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn create(&self, note: NewNote, now: DateTime<Utc>) -> RepoResult<notes::Model> {
        self.check_write()?;
        let created = notes::Model {
            id: Uuid::new_v4(),
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().notes.push(created.clone());
        Ok(created)
    }

    async fn find_all_by_user(&self, user_id: Uuid) -> RepoResult<Vec<notes::Model>> {
        let mut found: Vec<_> = self
            .tables
            .lock()
            .unwrap()
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<notes::Model>> {
        Ok(self.tables.lock().unwrap().notes.iter().find(|n| n.id == id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: NoteChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<notes::Model>> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(note) = tables.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            note.title = Some(title);
        }
        if let Some(content) = changes.content {
            note.content = content;
        }
        note.updated_at = now;
        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.check_write()?;
        self.tables.lock().unwrap().notes.retain(|n| n.id != id);
        Ok(())
    }
}
