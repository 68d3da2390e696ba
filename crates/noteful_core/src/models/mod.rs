//! Persisted records and API payloads.

/// Folder records and payloads.
pub mod folder;
/// Note records and payloads.
pub mod note;
/// Tag records and payloads.
pub mod tag;

use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// A record with a unique, user-chosen `name` (folders and tags).
///
/// Storage for these records is shared; the implementor only supplies the
/// entity label used in uniqueness errors and field accessors.
pub trait NamedRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Singular entity label, e.g. `"folder"`.
    const ENTITY: &'static str;

    /// Build a fresh record stamped with the current time.
    fn new(name: String) -> Self;
    fn id(&self) -> ObjectId;
    fn name(&self) -> &str;
    /// Replace the name and bump `updated_at`.
    fn rename(&mut self, name: String, at: DateTime<Utc>);
}

/// Request payload for creating or renaming a folder or tag.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct NameRequest {
    pub name: Option<String>,
}
