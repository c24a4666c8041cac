use actix_web::{HttpResponse, post, web};

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CreatedInvitationResponse, InvitationResponse};
use crate::state::AppState;

/// POST /invitations - nouveau code (8 hex, 7 jours)
#[post("")]
pub async fn create_invitation(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let invitation = state.invitations.create_invitation(auth.user_id).await?;
    Ok(HttpResponse::Created().json(CreatedInvitationResponse::from(invitation)))
}

/// POST /invitations/consume/{code}
#[post("/consume/{code}")]
pub async fn consume_invitation(
    auth: AuthUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let invitation = state
        .invitations
        .consume_invitation(auth.user_id, path.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(InvitationResponse::from(invitation)))
}

pub fn invitations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invitations")
            .service(create_invitation)
            .service(consume_invitation),
    );
}
