//! Note HTTP handlers.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::validate::{
    optional_id, path_id, required_title, tag_ids, INVALID_FOLDER_ID, INVALID_TAG_ID,
};
use crate::{error::HttpError, AppError, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Json,
};
use noteful_core::models::note::{Note, NoteFields, NoteListQuery, NoteRequest};
use noteful_core::NoteFilter;

/// Validate a create/replace payload into storable fields.
///
/// Checks run in order: title, folder id, then every tag id. Nothing is
/// written unless all of them pass.
fn note_fields(req: NoteRequest) -> Result<NoteFields, HttpError> {
    let title = required_title(req.title)?;
    let folder_id = optional_id(req.folder_id, INVALID_FOLDER_ID)?;
    let tags = tag_ids(req.tags)?;
    Ok(NoteFields {
        title,
        content: req.content,
        folder_id,
        tags,
    })
}

/// List notes, most recently updated first.
///
/// `searchTerm` matches title or content ignoring case; `folderId` and `tagId`
/// narrow the result further.
///
/// # Errors
/// Returns 400 when `folderId` or `tagId` is malformed.
pub async fn list_notes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NoteListQuery>,
) -> Result<Json<Vec<Note>>, HttpError> {
    let folder_id = optional_id(query.folder_id, INVALID_FOLDER_ID)?;
    let tag_id = optional_id(query.tag_id, INVALID_TAG_ID)?;
    let filter = NoteFilter::new(query.search_term.as_deref(), folder_id, tag_id);
    Ok(Json(state.db.notes.find(&filter)?))
}

/// Fetch one note.
///
/// # Errors
/// 400 for a malformed id, 404 when no note has it.
pub async fn get_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Note>, HttpError> {
    let id = path_id(&id)?;
    let note = state.db.notes.get(id)?.ok_or(AppError::NotFound)?;
    Ok(Json(note))
}

/// Create a note.
///
/// # Returns
/// `201 Created` with a `Location` header and the stored note.
///
/// # Errors
/// 400 when the title is missing or an identifier is malformed.
pub async fn create_note(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NoteRequest>,
) -> Result<Response, HttpError> {
    let note = Note::new(note_fields(req)?);
    state.db.notes.create(&note)?;
    tracing::info!(note_id = %note.id, "Created note");
    Ok(super::created("notes", note.id, note))
}

/// Replace a note's title, content, folder, and tags.
///
/// Optional fields missing from the body are cleared.
///
/// # Errors
/// 400 for a malformed path id or invalid payload, 404 when the note does not
/// exist.
pub async fn update_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<NoteRequest>,
) -> Result<Json<Note>, HttpError> {
    let id = path_id(&id)?;
    let fields = note_fields(req)?;
    let note = state
        .db
        .notes
        .replace(id, fields)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(note))
}

/// Delete a note. Unknown ids still return `204`.
pub async fn delete_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, HttpError> {
    let id = path_id(&id)?;
    if state.db.notes.delete(id)? {
        tracing::info!(note_id = %id, "Deleted note");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_fields_validates_title_before_identifiers() {
        let err = note_fields(NoteRequest {
            title: None,
            folder_id: Some("bad".to_string()),
            ..NoteRequest::default()
        })
        .expect_err("missing title");
        assert_eq!(err.message(), "Missing `title` in request body");

        let err = note_fields(NoteRequest {
            title: Some("t".to_string()),
            folder_id: Some("bad".to_string()),
            tags: Some(vec!["also bad".to_string()]),
            ..NoteRequest::default()
        })
        .expect_err("bad folder");
        assert_eq!(err.message(), INVALID_FOLDER_ID);
    }

    #[test]
    fn note_fields_clears_blank_folder() {
        let fields = note_fields(NoteRequest {
            title: Some("t".to_string()),
            folder_id: Some(String::new()),
            ..NoteRequest::default()
        })
        .expect("valid");
        assert_eq!(fields.folder_id, None);
        assert!(fields.tags.is_empty());
    }
}
