use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppError;
use crate::models::users::{self, AuthProvider};
use crate::repositories::{NewRefreshToken, NewUser, RefreshTokenRepository};
use crate::services::user_service::UserService;
use crate::utils::clock::Clock;
use crate::utils::jwt::JwtIssuer;
use crate::utils::token_verifier::IdentityVerifier;

/// Session émise au login / refresh
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: users::Model,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    tokens: Arc<dyn RefreshTokenRepository>,
    verifier: Arc<dyn IdentityVerifier>,
    jwt: Arc<JwtIssuer>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        users: UserService,
        tokens: Arc<dyn RefreshTokenRepository>,
        verifier: Arc<dyn IdentityVerifier>,
        jwt: Arc<JwtIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            verifier,
            jwt,
            clock,
        }
    }

    /// Vérifie l'id_token du provider puis retrouve / crée le user
    pub async fn login(&self, provider: AuthProvider, id_token: &str) -> Result<AuthSession, AppError> {
        let identity = self.verifier.verify(provider, id_token).await.map_err(|e| {
            warn!(?provider, error = %e, "provider token rejected");
            AppError::unauthorized("Unauthorized")
        })?;

        let user = self
            .users
            .find_or_create_by_provider(NewUser {
                provider,
                provider_id: identity.provider_id,
                email: identity.email,
                phone_number: None,
                name: identity.name,
                profile_image: identity.profile_image,
            })
            .await?;

        self.issue_tokens(user).await
    }

    /// Rotation : le refresh token présenté est détruit, une nouvelle paire est émise
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AppError> {
        let now = self.clock.now();

        let Some(saved) = self.tokens.find(refresh_token).await? else {
            return Err(AppError::unauthorized("Invalid or expired refresh token"));
        };

        if saved.is_expired(now) {
            self.tokens.delete(refresh_token).await?;
            return Err(AppError::unauthorized("Invalid or expired refresh token"));
        }

        let Some(user) = self.users.get_by_id(saved.user_id).await? else {
            return Err(AppError::unauthorized("User not found"));
        };

        // un refresh concurrent a déjà consommé ce token
        if !self.tokens.delete(refresh_token).await? {
            warn!(user_id = %user.id, "refresh token already rotated");
            return Err(AppError::unauthorized("Invalid or expired refresh token"));
        }

        self.issue_tokens(user).await
    }

    /// Idempotent : un token inconnu ou déjà révoqué n'est pas une erreur
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        self.tokens.delete(refresh_token).await?;
        Ok(())
    }

    async fn issue_tokens(&self, user: users::Model) -> Result<AuthSession, AppError> {
        let now = self.clock.now();
        let access_token = self.jwt.sign_access(user.id, user.email.as_deref(), now)?;
        let refresh_token = self.jwt.sign_refresh(user.id, now)?;

        self.tokens
            .create(
                NewRefreshToken {
                    token: refresh_token.clone(),
                    user_id: user.id,
                    expires_at: now + JwtIssuer::refresh_ttl(),
                },
                now,
            )
            .await?;

        info!(user_id = %user.id, "session issued");

        Ok(AuthSession {
            access_token,
            refresh_token,
            user,
        })
    }
}
