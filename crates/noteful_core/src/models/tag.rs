use super::NamedRecord;
use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A label that can be attached to any number of notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: ObjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NamedRecord for Tag {
    const ENTITY: &'static str = "tag";

    fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::with_timestamp(now),
            name,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> ObjectId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: String, at: DateTime<Utc>) {
        self.name = name;
        self.updated_at = at;
    }
}
