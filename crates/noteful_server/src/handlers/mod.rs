//! HTTP request handlers.

pub(crate) mod extract;
/// Folder endpoints.
pub mod folder;
/// Note endpoints.
pub mod note;
/// Tag endpoints.
pub mod tag;
pub(crate) mod validate;

use crate::error::HttpError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `201 Created` with a `Location` header pointing at the new record.
pub(crate) fn created<T: Serialize>(
    collection: &str,
    id: impl std::fmt::Display,
    body: T,
) -> Response {
    let location = format!("/api/{}/{}", collection, id);
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpError {
    HttpError::not_found()
}
