use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::dto::{FriendView, UserResponse};
use crate::models::friendships::{self, FriendshipStatus};
use crate::repositories::{FriendRepository, NewFriendship, UserRepository};
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct FriendService {
    friends: Arc<dyn FriendRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl FriendService {
    pub fn new(
        friends: Arc<dyn FriendRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            friends,
            users,
            clock,
        }
    }

    /// Crée une demande PENDING requester → addressee
    pub async fn send_request(
        &self,
        requester_id: Uuid,
        addressee_id: Uuid,
    ) -> Result<friendships::Model, AppError> {
        if requester_id == addressee_id {
            return Err(AppError::bad_request("You cannot send a friend request to yourself"));
        }

        if self.users.find_by_id(addressee_id).await?.is_none() {
            return Err(AppError::not_found("Target user not found"));
        }

        if let Some(existing) = self.friends.find_between(requester_id, addressee_id).await? {
            return Err(match existing.status {
                FriendshipStatus::Accepted => AppError::conflict("You are already friends"),
                FriendshipStatus::Pending => {
                    AppError::conflict("Friend request already exists or pending")
                }
            });
        }

        let created = self
            .friends
            .create(
                NewFriendship {
                    requester_id,
                    addressee_id,
                    status: FriendshipStatus::Pending,
                },
                self.clock.now(),
            )
            .await;

        match created {
            Ok(friendship) => {
                info!(friendship_id = %friendship.id, %requester_id, %addressee_id, "friend request sent");
                Ok(friendship)
            }
            // demande croisée arrivée entre la lecture et l'insert
            Err(e) if e.is_unique_violation() => {
                Err(AppError::conflict("Friend request already exists or pending"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Seul l'addressee peut accepter, et une seule fois
    pub async fn accept_request(
        &self,
        user_id: Uuid,
        friendship_id: Uuid,
    ) -> Result<friendships::Model, AppError> {
        let friendship = self
            .friends
            .find_by_id(friendship_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request not found"))?;

        if friendship.addressee_id != user_id {
            return Err(AppError::forbidden("You can only accept requests sent to you"));
        }

        if friendship.status == FriendshipStatus::Accepted {
            return Err(AppError::bad_request("Friend request already accepted"));
        }

        let accepted = self
            .friends
            .update_status(friendship_id, FriendshipStatus::Accepted, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found("Friend request not found"))?;

        info!(%friendship_id, "friend request accepted");
        Ok(accepted)
    }

    pub async fn list_friends(&self, user_id: Uuid) -> Result<Vec<FriendView>, AppError> {
        let friendships = self.friends.find_for_user(user_id, FriendshipStatus::Accepted).await?;
        self.with_counterparts(user_id, friendships).await
    }

    /// Demandes REÇUES en attente (pas celles envoyées)
    pub async fn list_pending_requests(&self, user_id: Uuid) -> Result<Vec<FriendView>, AppError> {
        let friendships = self
            .friends
            .find_for_user(user_id, FriendshipStatus::Pending)
            .await?
            .into_iter()
            .filter(|f| f.addressee_id == user_id)
            .collect();
        self.with_counterparts(user_id, friendships).await
    }

    /// Supprime la relation quel que soit son statut
    pub async fn remove(&self, user_id: Uuid, friendship_id: Uuid) -> Result<(), AppError> {
        let friendship = self
            .friends
            .find_by_id(friendship_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friendship not found"))?;

        if !friendship.involves(user_id) {
            return Err(AppError::forbidden("You are not part of this friendship"));
        }

        self.friends.delete(friendship_id).await?;
        info!(%friendship_id, %user_id, "friendship removed");
        Ok(())
    }

    async fn with_counterparts(
        &self,
        user_id: Uuid,
        friendships: Vec<friendships::Model>,
    ) -> Result<Vec<FriendView>, AppError> {
        let ids: Vec<Uuid> = friendships.iter().map(|f| f.counterpart_of(user_id)).collect();
        let users: HashMap<Uuid, _> = self
            .users
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        // un user supprimé entre-temps disparaît simplement de la liste
        Ok(friendships
            .into_iter()
            .filter_map(|f| {
                let friend = users.get(&f.counterpart_of(user_id)).cloned()?;
                Some(FriendView {
                    id: f.id,
                    status: f.status,
                    created_at: f.created_at,
                    updated_at: f.updated_at,
                    friend: UserResponse::from(friend),
                })
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::users::{self, AuthProvider};
    use crate::repositories::memory::MemoryStore;
    use crate::repositories::{RepoError, RepoResult};
    use crate::utils::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use sea_orm::DbErr;

    pub fn user(store: &MemoryStore, name: &str) -> users::Model {
        let now = Utc::now();
        let user = users::Model {
            id: Uuid::new_v4(),
            provider: AuthProvider::Google,
            provider_id: format!("sub-{name}"),
            email: Some(format!("{name}@example.com")),
            name: Some(name.to_string()),
            handle: None,
            handle_normalized: None,
            profile_image: None,
            phone_number: None,
            is_email_agreed: false,
            is_push_agreed: false,
            push_token: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_user(user.clone());
        user
    }

    fn build() -> (FriendService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = FriendService::new(
            store.clone(),
            store.clone(),
            Arc::new(FixedClock::new(Utc::now())),
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_cannot_befriend_yourself() {
        let (service, store) = build();
        let a = user(&store, "a");

        let result = service.send_request(a.id, a.id).await;

        assert!(matches!(result, Err(AppError::BadRequest(m)) if m == "You cannot send a friend request to yourself"));
    }

    #[tokio::test]
    async fn test_unknown_addressee_is_not_found() {
        let (service, store) = build();
        let a = user(&store, "a");

        let result = service.send_request(a.id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(m)) if m == "Target user not found"));
    }

    #[tokio::test]
    async fn test_send_request_creates_pending() {
        let (service, store) = build();
        let (a, b) = (user(&store, "a"), user(&store, "b"));

        let friendship = service.send_request(a.id, b.id).await.unwrap();

        assert_eq!(friendship.status, FriendshipStatus::Pending);
        assert_eq!(friendship.requester_id, a.id);
        assert_eq!(friendship.addressee_id, b.id);
    }

    #[tokio::test]
    async fn test_duplicate_request_in_either_direction_conflicts() {
        let (service, store) = build();
        let (a, b) = (user(&store, "a"), user(&store, "b"));
        service.send_request(a.id, b.id).await.unwrap();

        let same = service.send_request(a.id, b.id).await;
        let reverse = service.send_request(b.id, a.id).await;

        assert!(matches!(same, Err(AppError::Conflict(m)) if m == "Friend request already exists or pending"));
        assert!(matches!(reverse, Err(AppError::Conflict(m)) if m == "Friend request already exists or pending"));
        assert_eq!(store.friendships().len(), 1);
    }

    #[tokio::test]
    async fn test_request_between_friends_conflicts() {
        let (service, store) = build();
        let (a, b) = (user(&store, "a"), user(&store, "b"));
        let f = service.send_request(a.id, b.id).await.unwrap();
        service.accept_request(b.id, f.id).await.unwrap();

        let result = service.send_request(b.id, a.id).await;

        assert!(matches!(result, Err(AppError::Conflict(m)) if m == "You are already friends"));
    }

    /// Lecture "périmée" : find_between ne voit jamais la ligne, comme deux
    /// requêtes croisées qui lisent avant que l'autre n'insère
    struct StaleReads(Arc<MemoryStore>);

    #[async_trait]
    impl FriendRepository for StaleReads {
        async fn create(&self, f: NewFriendship, now: DateTime<Utc>) -> RepoResult<friendships::Model> {
            FriendRepository::create(self.0.as_ref(), f, now).await
        }
        async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<friendships::Model>> {
            FriendRepository::find_by_id(self.0.as_ref(), id).await
        }
        async fn find_between(&self, _a: Uuid, _b: Uuid) -> RepoResult<Option<friendships::Model>> {
            Ok(None)
        }
        async fn find_for_user(
            &self,
            user_id: Uuid,
            status: FriendshipStatus,
        ) -> RepoResult<Vec<friendships::Model>> {
            self.0.find_for_user(user_id, status).await
        }
        async fn update_status(
            &self,
            id: Uuid,
            status: FriendshipStatus,
            now: DateTime<Utc>,
        ) -> RepoResult<Option<friendships::Model>> {
            self.0.update_status(id, status, now).await
        }
        async fn delete(&self, id: Uuid) -> RepoResult<()> {
            FriendRepository::delete(self.0.as_ref(), id).await
        }
    }

    #[tokio::test]
    async fn test_crossed_requests_yield_one_row_and_one_conflict() {
        let store = Arc::new(MemoryStore::new());
        let service = FriendService::new(
            Arc::new(StaleReads(store.clone())),
            store.clone(),
            Arc::new(FixedClock::new(Utc::now())),
        );
        let (a, b) = (user(&store, "a"), user(&store, "b"));

        let (ab, ba) = tokio::join!(service.send_request(a.id, b.id), service.send_request(b.id, a.id));

        let outcomes = [ab, ba];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.iter().any(|r| matches!(
            r,
            Err(AppError::Conflict(m)) if m == "Friend request already exists or pending"
        )));
        let rows = store.friendships();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, FriendshipStatus::Pending);
    }

    #[tokio::test]
    async fn test_other_store_errors_propagate_unchanged() {
        let (service, store) = build();
        let (a, b) = (user(&store, "a"), user(&store, "b"));
        store.fail_next_write("unexpected-db-error");

        let result = service.send_request(a.id, b.id).await;

        assert!(matches!(
            result,
            Err(AppError::Repository(RepoError::Db(DbErr::Custom(m)))) if m == "unexpected-db-error"
        ));
    }

    #[tokio::test]
    async fn test_accept_rules() {
        let (service, store) = build();
        let (a, b, c) = (user(&store, "a"), user(&store, "b"), user(&store, "c"));
        let f = service.send_request(a.id, b.id).await.unwrap();

        let missing = service.accept_request(b.id, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(m)) if m == "Friend request not found"));

        let by_requester = service.accept_request(a.id, f.id).await;
        assert!(matches!(by_requester, Err(AppError::Forbidden(m)) if m == "You can only accept requests sent to you"));

        let by_stranger = service.accept_request(c.id, f.id).await;
        assert!(matches!(by_stranger, Err(AppError::Forbidden(_))));

        let accepted = service.accept_request(b.id, f.id).await.unwrap();
        assert_eq!(accepted.status, FriendshipStatus::Accepted);

        let again = service.accept_request(b.id, f.id).await;
        assert!(matches!(again, Err(AppError::BadRequest(m)) if m == "Friend request already accepted"));
    }

    #[tokio::test]
    async fn test_list_friends_maps_counterpart_in_both_directions() {
        let (service, store) = build();
        let (a, b, c) = (user(&store, "a"), user(&store, "b"), user(&store, "c"));
        let ab = service.send_request(a.id, b.id).await.unwrap();
        let ca = service.send_request(c.id, a.id).await.unwrap();
        service.accept_request(b.id, ab.id).await.unwrap();
        service.accept_request(a.id, ca.id).await.unwrap();

        let friends = service.list_friends(a.id).await.unwrap();

        let mut names: Vec<_> = friends.iter().map(|f| f.friend.name.clone().unwrap()).collect();
        names.sort();
        assert_eq!(names, vec!["b", "c"]);
        assert!(friends.iter().all(|f| f.status == FriendshipStatus::Accepted));
    }

    #[tokio::test]
    async fn test_pending_lists_only_received_requests() {
        let (service, store) = build();
        let (a, b, c) = (user(&store, "a"), user(&store, "b"), user(&store, "c"));
        service.send_request(a.id, b.id).await.unwrap(); // envoyée par a
        service.send_request(c.id, a.id).await.unwrap(); // reçue par a

        let pending = service.list_pending_requests(a.id).await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].friend.id, c.id);
        assert!(service.list_friends(a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_rules() {
        let (service, store) = build();
        let (a, b, c) = (user(&store, "a"), user(&store, "b"), user(&store, "c"));
        let pending = service.send_request(a.id, b.id).await.unwrap();

        let missing = service.remove(a.id, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(m)) if m == "Friendship not found"));

        let stranger = service.remove(c.id, pending.id).await;
        assert!(matches!(stranger, Err(AppError::Forbidden(m)) if m == "You are not part of this friendship"));

        // une demande PENDING peut être retirée par l'addressee
        service.remove(b.id, pending.id).await.unwrap();
        assert!(store.friendships().is_empty());

        let again = service.send_request(b.id, a.id).await.unwrap();
        service.accept_request(a.id, again.id).await.unwrap();
        service.remove(b.id, again.id).await.unwrap();
        assert!(store.friendships().is_empty());
    }
}
