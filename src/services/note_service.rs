use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::dto::{CreateNoteRequest, UpdateNoteRequest};
use crate::models::notes;
use crate::repositories::{NewNote, NoteChanges, NoteRepository};
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
    clock: Arc<dyn Clock>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { notes, clock }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateNoteRequest,
    ) -> Result<notes::Model, AppError> {
        let note = self
            .notes
            .create(
                NewNote {
                    user_id,
                    title: request.title,
                    content: request.content,
                },
                self.clock.now(),
            )
            .await?;

        debug!(note_id = %note.id, %user_id, "note created");
        Ok(note)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<notes::Model>, AppError> {
        Ok(self.notes.find_all_by_user(user_id).await?)
    }

    pub async fn get(&self, user_id: Uuid, note_id: Uuid) -> Result<notes::Model, AppError> {
        let note = self
            .notes
            .find_by_id(note_id)
            .await?
            .ok_or_else(|| AppError::not_found("Note not found"))?;

        if note.user_id != user_id {
            return Err(AppError::forbidden("Access denied"));
        }

        Ok(note)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        request: UpdateNoteRequest,
    ) -> Result<notes::Model, AppError> {
        self.get(user_id, note_id).await?;

        self.notes
            .update(
                note_id,
                NoteChanges {
                    title: request.title,
                    content: request.content,
                },
                self.clock.now(),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Note not found"))
    }

    pub async fn delete(&self, user_id: Uuid, note_id: Uuid) -> Result<(), AppError> {
        self.get(user_id, note_id).await?;
        self.notes.delete(note_id).await?;
        debug!(%note_id, %user_id, "note deleted");
        Ok(())
    }
}
