use actix_web::{HttpResponse, post, web};
use validator::Validate;

use crate::error::AppError;
use crate::models::dto::{AuthResponse, LoginRequest, RefreshRequest, UserResponse};
use crate::services::AuthSession;
use crate::state::AppState;

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: UserResponse::from(session.user),
        }
    }
}

/// POST /auth/login - id_token Apple/Google → session (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let body = body.into_inner();

    let session = state.auth.login(body.provider, &body.id_token).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

/// POST /auth/refresh - rotation du refresh token (PUBLIC)
#[post("/refresh")]
pub async fn refresh(
    body: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let session = state.auth.refresh(&body.refresh_token).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

/// POST /auth/logout - révoque le refresh token (PUBLIC)
#[post("/logout")]
pub async fn logout(
    body: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    state.auth.logout(&body.refresh_token).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(login)
            .service(refresh)
            .service(logout),
    );
}
