use actix_web::{HttpResponse, get, patch, web};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{UpdateProfileRequest, UpdateUserRequest, UserResponse};
use crate::state::AppState;

/// GET /me
#[get("")]
pub async fn get_me(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(auth.user))
}

/// PATCH /me - réglages (consentements, push token...)
#[patch("")]
pub async fn update_me(
    auth: AuthUser,
    body: web::Json<UpdateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = state.users.update_user(auth.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /me/profile - nom, téléphone, handle
#[patch("/profile")]
pub async fn update_profile(
    auth: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = state.users.update_profile(auth.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .service(get_me)
            .service(update_me)
            .service(update_profile),
    );
}
