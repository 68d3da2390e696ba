//! Identifier and required-field checks shared by handlers.

use crate::error::HttpError;
use noteful_core::models::note::dedup_tags;
use noteful_core::ObjectId;

pub(crate) const INVALID_ID: &str = "The `id` is not valid";
pub(crate) const INVALID_FOLDER_ID: &str = "The `folderId` is not valid";
pub(crate) const INVALID_TAG_ID: &str = "The `tagId` is not valid";
pub(crate) const INVALID_TAGS: &str = "The `tags` array contains an invalid `id`";
pub(crate) const MISSING_NAME: &str = "Missing `name` in request body";
pub(crate) const MISSING_TITLE: &str = "Missing `title` in request body";

/// Parse the `:id` path segment.
pub(crate) fn path_id(raw: &str) -> Result<ObjectId, HttpError> {
    ObjectId::parse(raw).map_err(|_| HttpError::bad_request(INVALID_ID))
}

/// Empty or whitespace-only values are treated as absent.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an optional id field, rejecting malformed values with `message`.
pub(crate) fn optional_id(
    value: Option<String>,
    message: &'static str,
) -> Result<Option<ObjectId>, HttpError> {
    normalize_optional(value)
        .map(|raw| ObjectId::parse(&raw).map_err(|_| HttpError::bad_request(message)))
        .transpose()
}

/// Parse every tag id before anything is written; repeats collapse.
pub(crate) fn tag_ids(tags: Option<Vec<String>>) -> Result<Vec<ObjectId>, HttpError> {
    let parsed = tags
        .unwrap_or_default()
        .iter()
        .map(|raw| ObjectId::parse(raw).map_err(|_| HttpError::bad_request(INVALID_TAGS)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dedup_tags(parsed))
}

/// Trimmed folder/tag name; blank counts as missing.
pub(crate) fn required_name(name: Option<String>) -> Result<String, HttpError> {
    normalize_optional(name).ok_or_else(|| HttpError::bad_request(MISSING_NAME))
}

/// Note title, kept as sent; blank counts as missing.
pub(crate) fn required_title(title: Option<String>) -> Result<String, HttpError> {
    match title {
        Some(title) if !title.trim().is_empty() => Ok(title),
        _ => Err(HttpError::bad_request(MISSING_TITLE)),
    }
}
