//! Note records, write payloads, and list query parameters.

use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<ObjectId>,
    #[serde(default)]
    pub tags: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated field set for creating or replacing a note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFields {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<ObjectId>,
    pub tags: Vec<ObjectId>,
}

/// Raw request payload for `POST /api/notes` and `PUT /api/notes/:id`.
///
/// Identifier fields stay as strings so that malformed values can be
/// rejected with a field-specific message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Query parameters for `GET /api/notes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListQuery {
    pub search_term: Option<String>,
    pub folder_id: Option<String>,
    pub tag_id: Option<String>,
}

impl Note {
    /// Create a note with a fresh id.
    pub fn new(fields: NoteFields) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::with_timestamp(now),
            title: fields.title,
            content: fields.content,
            folder_id: fields.folder_id,
            tags: fields.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every user-editable field, keeping `id` and `created_at`.
    pub fn replace(&mut self, fields: NoteFields, at: DateTime<Utc>) {
        self.title = fields.title;
        self.content = fields.content;
        self.folder_id = fields.folder_id;
        self.tags = fields.tags;
        self.updated_at = at;
    }

    /// `true` when the tag set contains `tag_id`.
    pub fn has_tag(&self, tag_id: ObjectId) -> bool {
        self.tags.contains(&tag_id)
    }
}

/// Collapse repeated tag ids, keeping the first occurrence of each.
pub fn dedup_tags(tags: Vec<ObjectId>) -> Vec<ObjectId> {
    let mut seen = std::collections::HashSet::with_capacity(tags.len());
    tags.into_iter().filter(|tag| seen.insert(*tag)).collect()
}
