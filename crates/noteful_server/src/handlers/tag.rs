//! Tag HTTP handlers.

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
use noteful_core::models::{tag::Tag, NameRequest, NamedRecord};

/// List all tags, ordered by name.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, HttpError> {
    Ok(Json(state.db.tags.list()?))
}

/// Fetch one tag.
pub async fn get_tag(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Tag>, HttpError> {
    let id = path_id(&id)?;
    let tag = state.db.tags.get(id)?.ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// Create a tag; responds `201 Created` with a `Location` header.
pub async fn create_tag(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NameRequest>,
) -> Result<Response, HttpError> {
    let tag = Tag::new(required_name(req.name)?);
    state.db.tags.create(&tag)?;
    tracing::info!(tag_id = %tag.id, "Created tag");
    Ok(super::created("tags", tag.id, tag))
}

/// Rename a tag. Names stay unique across tags.
pub async fn update_tag(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<NameRequest>,
) -> Result<Json<Tag>, HttpError> {
    let id = path_id(&id)?;
    let name = required_name(req.name)?;
    let tag = state.db.tags.rename(id, name)?.ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// Delete a tag and remove it from every note.
///
/// Deleting an unknown id still succeeds.
///
/// # Errors
/// 400 for a malformed id.
pub async fn delete_tag(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, HttpError> {
    let id = path_id(&id)?;
    TransactionOps::delete_tag_and_strip_notes(&state.db, id)?;
    Ok(StatusCode::NO_CONTENT)
}
