use actix_web::{HttpResponse, delete, get, patch, post, web};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{FriendRequestBody, FriendshipResponse};
use crate::state::AppState;

#[post("/request")]
pub async fn send_request(
    auth: AuthUser,
    body: web::Json<FriendRequestBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let friendship = state.friends.send_request(auth.user_id, body.user_id).await?;
    Ok(HttpResponse::Created().json(FriendshipResponse::from(friendship)))
}

#[patch("/accept/{id}")]
pub async fn accept_request(
    auth: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let friendship = state.friends.accept_request(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(FriendshipResponse::from(friendship)))
}

#[get("")]
pub async fn list_friends(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.friends.list_friends(auth.user_id).await?))
}

/// Demandes reçues en attente
#[get("/pending")]
pub async fn list_pending(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.friends.list_pending_requests(auth.user_id).await?))
}

#[delete("/{id}")]
pub async fn remove_friend(
    auth: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.friends.remove(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn friends_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/friends")
            .service(send_request)
            .service(accept_request)
            .service(list_friends)
            .service(list_pending)
            .service(remove_friend),
    );
}
