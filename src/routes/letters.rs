use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CreateLetterRequest, LetterResponse};
use crate::state::AppState;

#[post("")]
pub async fn send_letter(
    auth: AuthUser,
    body: web::Json<CreateLetterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let letter = state.letters.send_letter(auth.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(letter))
}

/// Lettres reçues et déjà livrées
#[get("/inbox")]
pub async fn inbox(auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let letters: Vec<LetterResponse> = state
        .letters
        .get_inbox(auth.user_id, state.letters.now())
        .await?
        .into_iter()
        .map(LetterResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(letters))
}

/// Lettres envoyées, sans contenu
#[get("/sent")]
pub async fn sent(auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.letters.get_sent(auth.user_id).await?))
}

#[get("/{id}")]
pub async fn letter_detail(
    auth: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let letter = state
        .letters
        .get_detail(auth.user_id, path.into_inner(), state.letters.now())
        .await?;
    Ok(HttpResponse::Ok().json(LetterResponse::from(letter)))
}

pub fn letters_routes(cfg: &mut web::ServiceConfig) {
    // /inbox et /sent avant /{id}
    cfg.service(
        web::scope("/letters")
            .service(send_letter)
            .service(inbox)
            .service(sent)
            .service(letter_detail),
    );
}
