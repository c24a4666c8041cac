use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::users;
use crate::state::AppState;

/// User authentifié par le header "Authorization: Bearer <access token>"
/// Utilisé comme extracteur dans toutes les routes protégées
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user: users::Model,
}

fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    // 1. Extraire le header Authorization
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    // 2. Convertir le header en string
    let value = header
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;

    // 3. Extraire le token (format: "Bearer <token>")
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized("Invalid Authorization format (expected: Bearer <token>)")
        })
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let token = token?;
            let state = state.ok_or_else(|| AppError::Internal("AppState is not registered".into()))?;

            // 4. Vérifier le JWT (signature, expiration, access token seulement)
            let claims = state.jwt.verify_access(&token).inspect_err(|e| {
                warn!(error = %e, "bearer token rejected");
            })?;

            // 5. Le user doit toujours exister
            let user = state
                .users
                .get_by_id(claims.sub)
                .await?
                .ok_or_else(|| AppError::unauthorized("User not found"))?;

            Ok(AuthUser {
                user_id: user.id,
                user,
            })
        })
    }
}
