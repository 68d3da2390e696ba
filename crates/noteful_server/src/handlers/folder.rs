//! Folder HTTP handlers.

use super::extract::{ApiJson, ApiPath};
use super::validate::{path_id, required_name};
use crate::{error::HttpError, AppError, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Json,
};
use noteful_core::db::TransactionOps;
use noteful_core::models::{folder::Folder, NameRequest, NamedRecord};

/// List all folders, ordered by name.
///
/// # Errors
/// Returns an error if listing fails.
pub async fn list_folders(State(state): State<AppState>) -> Result<Json<Vec<Folder>>, HttpError> {
    Ok(Json(state.db.folders.list()?))
}

/// Fetch one folder.
///
/// # Errors
/// 400 for a malformed id, 404 when no folder has it.
pub async fn get_folder(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Folder>, HttpError> {
    let id = path_id(&id)?;
    let folder = state.db.folders.get(id)?.ok_or(AppError::NotFound)?;
    Ok(Json(folder))
}

/// Create a folder.
///
/// # Returns
/// `201 Created` with a `Location` header and the new folder.
///
/// # Errors
/// 400 when the name is missing or already used.
pub async fn create_folder(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NameRequest>,
) -> Result<Response, HttpError> {
    let folder = Folder::new(required_name(req.name)?);
    state.db.folders.create(&folder)?;
    tracing::info!(folder_id = %folder.id, "Created folder");
    Ok(super::created("folders", folder.id, folder))
}

/// Rename a folder.
///
/// # Errors
/// 400 for a malformed id, missing name, or a name owned by another folder;
/// 404 when the folder does not exist.
pub async fn update_folder(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<NameRequest>,
) -> Result<Json<Folder>, HttpError> {
    let id = path_id(&id)?;
    let name = required_name(req.name)?;
    let folder = state
        .db
        .folders
        .rename(id, name)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(folder))
}

/// Delete a folder and unfile its notes.
///
/// Deleting an unknown id still succeeds.
///
/// # Errors
/// 400 for a malformed id.
pub async fn delete_folder(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, HttpError> {
    let id = path_id(&id)?;
    TransactionOps::delete_folder_and_unfile_notes(&state.db, id)?;
    Ok(StatusCode::NO_CONTENT)
}
