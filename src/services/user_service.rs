use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::dto::{UpdateProfileRequest, UpdateUserRequest};
use crate::models::users;
use crate::repositories::{NewUser, UserChanges, UserRepository};
use crate::utils::clock::Clock;

pub const HANDLE_MIN_LENGTH: usize = 3;
pub const HANDLE_MAX_LENGTH: usize = 30;

/// Handle trim + lowercase, None si le format est invalide
/// (3 à 30 caractères parmi a-z, 0-9, '.' et '_')
pub fn normalize_handle(handle: &str) -> Option<String> {
    let normalized = handle.trim().to_lowercase();
    let length = normalized.chars().count();

    let valid = (HANDLE_MIN_LENGTH..=HANDLE_MAX_LENGTH).contains(&length)
        && normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_');

    valid.then_some(normalized)
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<users::Model>, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Retourne le user lié à (provider, provider_id) ou le crée.
    /// Un nouveau user doit avoir un email ou un numéro de téléphone.
    pub async fn find_or_create_by_provider(&self, data: NewUser) -> Result<users::Model, AppError> {
        if let Some(existing) = self.users.find_by_provider(data.provider, &data.provider_id).await? {
            return Ok(existing);
        }

        if data.email.is_none() && data.phone_number.is_none() {
            return Err(AppError::bad_request(
                "Email or phoneNumber is required when creating a new user",
            ));
        }

        let user = self.users.create(data, self.clock.now()).await?;
        info!(user_id = %user.id, provider = ?user.provider, "user created");
        Ok(user)
    }

    /// PATCH /me
    pub async fn update_user(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<users::Model, AppError> {
        let changes = UserChanges {
            name: request.name,
            phone_number: request.phone_number,
            profile_image: request.profile_image,
            is_email_agreed: request.is_email_agreed,
            is_push_agreed: request.is_push_agreed,
            push_token: request.push_token,
            handle: None,
        };

        self.users
            .update(id, changes, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// PATCH /me/profile : name, phoneNumber et réservation du handle
    pub async fn update_profile(
        &self,
        id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<users::Model, AppError> {
        let mut changes = UserChanges {
            name: request.name,
            phone_number: request.phone_number,
            ..Default::default()
        };

        if let Some(handle) = request.handle {
            let normalized =
                normalize_handle(&handle).ok_or_else(|| AppError::bad_request("Invalid handle format"))?;

            if let Some(owner) = self.users.find_by_handle(&normalized).await? {
                if owner.id != id {
                    return Err(AppError::conflict("Handle already taken"));
                }
            }

            changes.handle = Some((handle, normalized));
        }

        match self.users.update(id, changes, self.clock.now()).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AppError::not_found("User not found")),
            // un autre user a pris le handle entre la vérification et l'update
            Err(e) if e.is_unique_violation() => Err(AppError::conflict("Handle already taken")),
            Err(e) => Err(e.into()),
        }
    }
}
