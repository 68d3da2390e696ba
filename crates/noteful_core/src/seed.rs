//! Reset a database and load a JSON fixture of folders, tags, and notes.
//!
//! Fixture entries carry their own ids (`id` or `_id`) so notes can reference
//! folders and tags by value. Timestamps are optional and default to the time
//! of loading.

use crate::db::named::NamedDb;
use crate::db::note::NoteDb;
use crate::db::tables::{FOLDERS, FOLDER_NAMES, NOTES, NOTES_BY_UPDATED, TAGS, TAG_NAMES};
use crate::error::AppError;
use crate::id::ObjectId;
use crate::models::{folder::Folder, note::dedup_tags, note::Note, tag::Tag};
use crate::Database;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// Folder or tag entry in a fixture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedNamed {
    #[serde(alias = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Note entry in a fixture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedNote {
    #[serde(alias = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<ObjectId>,
    #[serde(default)]
    pub tags: Vec<ObjectId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A full fixture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub folders: Vec<SeedNamed>,
    #[serde(default)]
    pub tags: Vec<SeedNamed>,
    #[serde(default)]
    pub notes: Vec<SeedNote>,
}

/// Row counts inserted by [`Database::reset_with_seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub folders: usize,
    pub tags: usize,
    pub notes: usize,
}

impl SeedData {
    /// Parse a fixture from JSON text.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] when the JSON does not match the
    /// fixture shape (including malformed ids).
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json)
            .map_err(|err| AppError::BadRequest(format!("Invalid seed data: {}", err)))
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to read seed file '{}': {}",
                path.display(),
                err
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Apply the same required-field rules as the API: folder and tag names
    /// and note titles must not be blank.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] naming the first offending entry.
    pub fn validate(&self) -> Result<(), AppError> {
        let blank_name = |kind: &str, entry: &SeedNamed| {
            entry.name.trim().is_empty().then(|| {
                AppError::BadRequest(format!(
                    "Invalid seed data: {} {} has a blank name",
                    kind, entry.id
                ))
            })
        };
        if let Some(err) = self
            .folders
            .iter()
            .find_map(|entry| blank_name("folder", entry))
            .or_else(|| self.tags.iter().find_map(|entry| blank_name("tag", entry)))
        {
            return Err(err);
        }
        if let Some(note) = self.notes.iter().find(|note| note.title.trim().is_empty()) {
            return Err(AppError::BadRequest(format!(
                "Invalid seed data: note {} has a blank title",
                note.id
            )));
        }
        Ok(())
    }
}

fn stamps(
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let created = created_at.unwrap_or(now);
    (created, updated_at.unwrap_or(created))
}

impl From<(&SeedNamed, DateTime<Utc>)> for Folder {
    fn from((seed, now): (&SeedNamed, DateTime<Utc>)) -> Self {
        let (created_at, updated_at) = stamps(seed.created_at, seed.updated_at, now);
        Self {
            id: seed.id,
            name: seed.name.trim().to_string(),
            created_at,
            updated_at,
        }
    }
}

impl From<(&SeedNamed, DateTime<Utc>)> for Tag {
    fn from((seed, now): (&SeedNamed, DateTime<Utc>)) -> Self {
        let (created_at, updated_at) = stamps(seed.created_at, seed.updated_at, now);
        Self {
            id: seed.id,
            name: seed.name.trim().to_string(),
            created_at,
            updated_at,
        }
    }
}

impl From<(&SeedNote, DateTime<Utc>)> for Note {
    fn from((seed, now): (&SeedNote, DateTime<Utc>)) -> Self {
        let (created_at, updated_at) = stamps(seed.created_at, seed.updated_at, now);
        Self {
            id: seed.id,
            title: seed.title.clone(),
            content: seed.content.clone(),
            folder_id: seed.folder_id,
            tags: dedup_tags(seed.tags.clone()),
            created_at,
            updated_at,
        }
    }
}

impl Database {
    /// Drop every row and insert `seed` in one write transaction.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for blank names or titles,
    /// [`AppError::UniqueViolation`] for repeated folder/tag names,
    /// a storage error for repeated ids, or any redb failure. The database is
    /// unchanged when an error is returned.
    pub fn reset_with_seed(&self, seed: &SeedData) -> Result<SeedSummary, AppError> {
        seed.validate()?;
        let now = Utc::now();
        let write_txn = self.db.begin_write()?;

        write_txn.delete_table(FOLDERS)?;
        write_txn.delete_table(FOLDER_NAMES)?;
        write_txn.delete_table(TAGS)?;
        write_txn.delete_table(TAG_NAMES)?;
        write_txn.delete_table(NOTES)?;
        write_txn.delete_table(NOTES_BY_UPDATED)?;

        for entry in &seed.folders {
            NamedDb::<Folder>::insert_in_txn(&write_txn, &Folder::from((entry, now)))?;
        }
        for entry in &seed.tags {
            NamedDb::<Tag>::insert_in_txn(&write_txn, &Tag::from((entry, now)))?;
        }
        for entry in &seed.notes {
            NoteDb::insert_in_txn(&write_txn, &Note::from((entry, now)))?;
        }
        // Empty fixtures still need every table to exist for readers.
        write_txn.open_table(FOLDERS)?;
        write_txn.open_table(FOLDER_NAMES)?;
        write_txn.open_table(TAGS)?;
        write_txn.open_table(TAG_NAMES)?;
        write_txn.open_table(NOTES)?;
        write_txn.open_table(NOTES_BY_UPDATED)?;

        write_txn.commit()?;

        let summary = SeedSummary {
            folders: seed.folders.len(),
            tags: seed.tags.len(),
            notes: seed.notes.len(),
        };
        tracing::info!(
            folders = summary.folders,
            tags = summary.tags,
            notes = summary.notes,
            "Seeded database"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NamedRecord;
    use crate::query::NoteFilter;
    use crate::test_support::setup_temp_db;

    const FIXTURE: &str = r#"{
        "folders": [
            { "_id": "111111111111111111111100", "name": "Archive" },
            { "_id": "111111111111111111111101", "name": "Drafts" }
        ],
        "tags": [
            { "_id": "222222222222222222222200", "name": "foo" }
        ],
        "notes": [
            {
                "_id": "000000000000000000000000",
                "title": "5 life lessons learned from cats",
                "content": "Lorem ipsum",
                "folderId": "111111111111111111111100",
                "tags": ["222222222222222222222200", "222222222222222222222200"],
                "createdAt": "2018-06-01T10:00:00Z",
                "updatedAt": "2018-06-02T10:00:00Z"
            },
            {
                "id": "000000000000000000000001",
                "title": "What the government doesn't want you to know about cats"
            }
        ]
    }"#;

    #[test]
    fn reset_with_seed_replaces_existing_rows() {
        let (db, _temp) = setup_temp_db();
        db.folders
            .create(&Folder::new("Stale".to_string()))
            .expect("pre-existing folder");

        let seed = SeedData::from_json_str(FIXTURE).expect("parse fixture");
        let summary = db.reset_with_seed(&seed).expect("seed");
        assert_eq!(
            summary,
            SeedSummary {
                folders: 2,
                tags: 1,
                notes: 2
            }
        );

        let names: Vec<String> = db
            .folders
            .list()
            .expect("list")
            .into_iter()
            .map(|folder| folder.name)
            .collect();
        assert_eq!(names, vec!["Archive", "Drafts"]);
        assert_eq!(db.notes.count().expect("count"), 2);

        let first = db
            .notes
            .get(ObjectId::parse("000000000000000000000000").expect("id"))
            .expect("get")
            .expect("seeded note");
        assert_eq!(first.tags.len(), 1, "duplicate tag ids collapse");
        assert_eq!(first.updated_at.to_rfc3339(), "2018-06-02T10:00:00+00:00");
    }

    #[test]
    fn reset_with_seed_rejects_duplicate_names_and_keeps_old_data() {
        let (db, _temp) = setup_temp_db();
        let seed = SeedData::from_json_str(FIXTURE).expect("parse fixture");
        db.reset_with_seed(&seed).expect("initial seed");

        let duplicate = SeedData::from_json_str(
            r#"{ "tags": [
                { "id": "333333333333333333333300", "name": "same" },
                { "id": "333333333333333333333301", "name": "same" }
            ] }"#,
        )
        .expect("parse duplicate fixture");
        let err = db
            .reset_with_seed(&duplicate)
            .expect_err("duplicate names must fail");
        assert!(matches!(
            err,
            AppError::UniqueViolation {
                entity: "tag",
                field: "name"
            }
        ));

        assert_eq!(db.notes.find(&NoteFilter::default()).expect("find").len(), 2);
        assert_eq!(db.tags.list().expect("tags").len(), 1);
    }

    #[test]
    fn reset_with_seed_rejects_blank_names_and_titles() {
        let (db, _temp) = setup_temp_db();
        db.reset_with_seed(&SeedData::from_json_str(FIXTURE).expect("parse fixture"))
            .expect("initial seed");

        let cases = [
            (
                r#"{ "folders": [ { "id": "444444444444444444444400", "name": "  " } ] }"#,
                "folder 444444444444444444444400 has a blank name",
            ),
            (
                r#"{ "tags": [ { "id": "444444444444444444444401", "name": "" } ] }"#,
                "tag 444444444444444444444401 has a blank name",
            ),
            (
                r#"{ "notes": [ { "id": "444444444444444444444402", "title": " " } ] }"#,
                "note 444444444444444444444402 has a blank title",
            ),
        ];
        for (json, fragment) in cases {
            let seed = SeedData::from_json_str(json).expect("parse");
            let err = db.reset_with_seed(&seed).expect_err("blank field");
            assert!(
                matches!(err, AppError::BadRequest(ref message) if message.contains(fragment)),
                "unexpected: {}",
                err
            );
        }

        assert_eq!(db.folders.list().expect("folders").len(), 2);
        assert_eq!(db.notes.count().expect("count"), 2);
    }

    #[test]
    fn from_json_str_rejects_malformed_ids() {
        let err = SeedData::from_json_str(r#"{ "folders": [ { "id": "nope", "name": "x" } ] }"#)
            .expect_err("malformed id");
        assert!(matches!(err, AppError::BadRequest(ref message) if message.contains("Invalid seed data")));
    }
}
