//! Request extractors with API-shaped rejections.

use crate::error::HttpError;
use axum::extract::{FromRequest, FromRequestParts};

/// `axum::Json` whose rejection renders as an [`HttpError`] body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(HttpError))]
pub(crate) struct ApiJson<T>(pub T);

/// `axum::extract::Path`; undecodable segments become "The `id` is not valid".
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(HttpError))]
pub(crate) struct ApiPath<T>(pub T);

/// `axum::extract::Query` with a JSON error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(HttpError))]
pub(crate) struct ApiQuery<T>(pub T);
