use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::dto::{CreateLetterRequest, SentLetterResponse};
use crate::models::friendships::FriendshipStatus;
use crate::models::letters;
use crate::repositories::{FriendRepository, LetterRepository, NewLetter};
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct LetterService {
    letters: Arc<dyn LetterRepository>,
    friends: Arc<dyn FriendRepository>,
    clock: Arc<dyn Clock>,
}

impl LetterService {
    pub fn new(
        letters: Arc<dyn LetterRepository>,
        friends: Arc<dyn FriendRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            letters,
            friends,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Envoi réservé aux amis ACCEPTED, livraison strictement dans le futur
    pub async fn send_letter(
        &self,
        sender_id: Uuid,
        request: CreateLetterRequest,
    ) -> Result<SentLetterResponse, AppError> {
        let now = self.clock.now();

        let are_friends = self
            .friends
            .find_between(sender_id, request.recipient_id)
            .await?
            .is_some_and(|f| f.status == FriendshipStatus::Accepted);
        if !are_friends {
            return Err(AppError::forbidden("You can only send letters to accepted friends"));
        }

        if request.deliver_at <= now {
            return Err(AppError::bad_request("deliverAt must be in the future"));
        }

        let letter = self
            .letters
            .create(
                NewLetter {
                    sender_id,
                    recipient_id: request.recipient_id,
                    content: request.content,
                    deliver_at: request.deliver_at,
                },
                now,
            )
            .await?;

        info!(letter_id = %letter.id, %sender_id, deliver_at = %letter.deliver_at, "letter scheduled");
        Ok(SentLetterResponse::from(letter))
    }

    pub async fn get_inbox(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<letters::Model>, AppError> {
        Ok(self.letters.find_inbox(user_id, now).await?)
    }

    pub async fn get_sent(&self, user_id: Uuid) -> Result<Vec<SentLetterResponse>, AppError> {
        Ok(self
            .letters
            .find_sent(user_id)
            .await?
            .into_iter()
            .map(SentLetterResponse::from)
            .collect())
    }

    /// Contenu visible par le recipient seul, une fois deliver_at atteint
    pub async fn get_detail(
        &self,
        user_id: Uuid,
        letter_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<letters::Model, AppError> {
        let letter = self
            .letters
            .find_by_id(letter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Letter not found"))?;

        if letter.recipient_id != user_id {
            return Err(AppError::forbidden("Only recipient can access letter content"));
        }

        if !letter.is_delivered(now) {
            return Err(AppError::forbidden("Letter is not delivered yet"));
        }

        Ok(letter)
    }
}
