use std::sync::Arc;

use chrono::Duration;
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::friendships::FriendshipStatus;
use crate::models::invitations;
use crate::repositories::{FriendRepository, InvitationRepository, NewFriendship, NewInvitation};
use crate::utils::clock::Clock;

const CODE_BYTES: usize = 4;
const MAX_CODE_ATTEMPTS: usize = 3;
const INVITATION_TTL_DAYS: i64 = 7;

/// 4 octets aléatoires → 8 caractères hex majuscules
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode_upper(bytes)
}

#[derive(Clone)]
pub struct InvitationService {
    invitations: Arc<dyn InvitationRepository>,
    friends: Arc<dyn FriendRepository>,
    clock: Arc<dyn Clock>,
}

impl InvitationService {
    pub fn new(
        invitations: Arc<dyn InvitationRepository>,
        friends: Arc<dyn FriendRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invitations,
            friends,
            clock,
        }
    }

    /// Nouveau code valable 7 jours. Collision sur le code → nouveau tirage,
    /// au plus MAX_CODE_ATTEMPTS essais
    pub async fn create_invitation(&self, inviter_id: Uuid) -> Result<invitations::Model, AppError> {
        let now = self.clock.now();

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let invitation = NewInvitation {
                inviter_id,
                code: generate_code(),
                expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            };

            match self.invitations.create(invitation, now).await {
                Ok(created) => {
                    info!(invitation_id = %created.id, %inviter_id, "invitation issued");
                    return Ok(created);
                }
                Err(e) if e.is_unique_violation() => {
                    warn!(attempt, "invitation code collision");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::ServiceUnavailable(
            "Unable to issue invitation code. Please try again.".to_string(),
        ))
    }

    /// Rend les deux users amis (ACCEPTED) puis marque le code utilisé.
    /// L'amitié est écrite d'abord : si la consommation est perdue face à un
    /// concurrent, elle reste en place et l'appel répond 410.
    pub async fn consume_invitation(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> Result<invitations::Model, AppError> {
        let now = self.clock.now();

        let invitation = self
            .invitations
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid invitation code"))?;

        if invitation.is_used() {
            return Err(AppError::gone("Invitation already used"));
        }

        if invitation.is_expired(now) {
            return Err(AppError::gone("Invitation expired"));
        }

        if invitation.inviter_id == user_id {
            return Err(AppError::bad_request("You cannot use your own invitation code"));
        }

        let promoted = match self.friends.find_between(invitation.inviter_id, user_id).await? {
            Some(existing) if existing.status == FriendshipStatus::Accepted => {
                return Err(AppError::conflict("You are already friends"));
            }
            Some(pending) => self
                .friends
                .update_status(pending.id, FriendshipStatus::Accepted, now)
                .await?
                .is_some(),
            None => false,
        };

        // pas de PENDING, ou supprimée entre la lecture et l'update
        if !promoted {
            self.friends
                .create(
                    NewFriendship {
                        requester_id: invitation.inviter_id,
                        addressee_id: user_id,
                        status: FriendshipStatus::Accepted,
                    },
                    now,
                )
                .await?;
        }

        let Some(consumed) = self
            .invitations
            .consume_if_available(invitation.id, user_id, now)
            .await?
        else {
            warn!(invitation_id = %invitation.id, %user_id, "invitation consumed concurrently");
            return Err(AppError::gone("Invitation already used"));
        };

        info!(invitation_id = %consumed.id, %user_id, "invitation consumed");
        Ok(consumed)
    }
}
