use actix_web::{HttpResponse, delete, get, patch, post, web};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest};
use crate::state::AppState;

#[get("")]
pub async fn list_notes(auth: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let notes: Vec<NoteResponse> = state
        .notes
        .list(auth.user_id)
        .await?
        .into_iter()
        .map(NoteResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(notes))
}

#[post("")]
pub async fn create_note(
    auth: AuthUser,
    body: web::Json<CreateNoteRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let note = state.notes.create(auth.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(NoteResponse::from(note)))
}

#[get("/{id}")]
pub async fn get_note(
    auth: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let note = state.notes.get(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(NoteResponse::from(note)))
}

#[patch("/{id}")]
pub async fn update_note(
    auth: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateNoteRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let note = state
        .notes
        .update(auth.user_id, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(NoteResponse::from(note)))
}

#[delete("/{id}")]
pub async fn delete_note(
    auth: AuthUser,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.notes.delete(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn notes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .service(list_notes)
            .service(create_note)
            .service(get_note)
            .service(update_note)
            .service(delete_note),
    );
}
