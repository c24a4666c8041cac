// Data Transfer Objects : corps de requête (validés avec validator) et
// réponses JSON. Les noms de champs sont en camelCase côté client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::friendships::FriendshipStatus;
use crate::models::users::AuthProvider;
use crate::models::{friendships, invitations, letters, notes, users};

// ----------------------------------------------------------------------------
// Auth
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub provider: AuthProvider,
    #[validate(length(min = 1, message = "idToken is required"))]
    pub id_token: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refreshToken is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

// ----------------------------------------------------------------------------
// Users
// ----------------------------------------------------------------------------

/// User renvoyé au client, sans provider_id ni handle_normalized
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub is_email_agreed: bool,
    pub is_push_agreed: bool,
    pub push_token: Option<String>,
    pub provider: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            handle: user.handle,
            profile_image: user.profile_image,
            phone_number: user.phone_number,
            is_email_agreed: user.is_email_agreed,
            is_push_agreed: user.is_push_agreed,
            push_token: user.push_token,
            provider: user.provider,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// PATCH /me : champ absent = inchangé
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub is_email_agreed: Option<bool>,
    pub is_push_agreed: Option<bool>,
    pub push_token: Option<String>,
}

/// PATCH /me/profile : le handle est vérifié par UserService
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    pub handle: Option<String>,
}

// ----------------------------------------------------------------------------
// Friends
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<friendships::Model> for FriendshipResponse {
    fn from(f: friendships::Model) -> Self {
        Self {
            id: f.id,
            requester_id: f.requester_id,
            addressee_id: f.addressee_id,
            status: f.status,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Vue "depuis moi" d'une relation : friend = l'autre user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendView {
    pub id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub friend: UserResponse,
}

// ----------------------------------------------------------------------------
// Invitations
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvitationResponse {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl From<invitations::Model> for CreatedInvitationResponse {
    fn from(invitation: invitations::Model) -> Self {
        Self {
            code: invitation.code,
            expires_at: invitation.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub inviter_id: Uuid,
    pub code: String,
    pub used_by_id: Option<Uuid>,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<invitations::Model> for InvitationResponse {
    fn from(i: invitations::Model) -> Self {
        Self {
            id: i.id,
            inviter_id: i.inviter_id,
            code: i.code,
            used_by_id: i.used_by_id,
            used_at: i.used_at,
            expires_at: i.expires_at,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

// ----------------------------------------------------------------------------
// Letters
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLetterRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 10000, message = "content must be between 1 and 10000 characters"))]
    pub content: String,
    pub deliver_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LetterResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub deliver_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<letters::Model> for LetterResponse {
    fn from(l: letters::Model) -> Self {
        Self {
            id: l.id,
            sender_id: l.sender_id,
            recipient_id: l.recipient_id,
            content: l.content,
            deliver_at: l.deliver_at,
            read_at: l.read_at,
            created_at: l.created_at,
        }
    }
}

/// Métadonnées d'une lettre, pas de champ content
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentLetterResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub deliver_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<letters::Model> for SentLetterResponse {
    fn from(l: letters::Model) -> Self {
        Self {
            id: l.id,
            sender_id: l.sender_id,
            recipient_id: l.recipient_id,
            deliver_at: l.deliver_at,
            read_at: l.read_at,
            created_at: l.created_at,
        }
    }
}

// ----------------------------------------------------------------------------
// Notes
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<notes::Model> for NoteResponse {
    fn from(n: notes::Model) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            title: n.title,
            content: n.content,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

// ----------------------------------------------------------------------------
// Health
// ----------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: String,
    pub time: DateTime<Utc>,
}
