//! Note storage operations backed by redb.

use super::tables::{NOTES, NOTES_BY_UPDATED};
use crate::error::AppError;
use crate::id::ObjectId;
use crate::models::note::{Note, NoteFields};
use crate::query::NoteFilter;
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Persisted note layout.
///
/// bincode is not self-describing, so the row keeps every field in a fixed
/// order instead of reusing the API type's skip rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NoteRow {
    id: ObjectId,
    title: String,
    content: Option<String>,
    folder_id: Option<ObjectId>,
    tags: Vec<ObjectId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Note> for NoteRow {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            folder_id: note.folder_id,
            tags: note.tags.clone(),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            folder_id: row.folder_id,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) fn encode_note(note: &Note) -> Result<Vec<u8>, AppError> {
    Ok(bincode::serialize(&NoteRow::from(note))?)
}

pub(crate) fn decode_note(bytes: &[u8]) -> Result<Note, AppError> {
    let row: NoteRow = bincode::deserialize(bytes)?;
    Ok(row.into())
}

/// Key for the recency index; newer timestamps sort first.
pub(crate) fn reverse_timestamp_key(updated_at: DateTime<Utc>) -> u64 {
    // Pre-epoch (and post-2262) timestamps are clamped.
    let nanos = updated_at.timestamp_nanos_opt().unwrap_or(0).max(0) as u64;
    u64::MAX - nanos
}

/// Accessor for note-related redb tables.
pub struct NoteDb {
    db: Arc<redb::Database>,
}

impl NoteDb {
    /// Initialize note tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(NOTES)?;
        write_txn.open_table(NOTES_BY_UPDATED)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new note and its recency index row atomically.
    ///
    /// # Errors
    /// Returns an error when the id already exists, serialization fails, or
    /// storage operations fail.
    pub fn create(&self, note: &Note) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        Self::insert_in_txn(&write_txn, note)?;
        write_txn.commit()?;
        Ok(())
    }

    pub(crate) fn insert_in_txn(write_txn: &WriteTransaction, note: &Note) -> Result<(), AppError> {
        let key = note.id.to_hex();
        let encoded = encode_note(note)?;

        let mut notes = write_txn.open_table(NOTES)?;
        let mut updated = write_txn.open_table(NOTES_BY_UPDATED)?;
        if notes.get(key.as_str())?.is_some() {
            return Err(AppError::StorageMessage(format!(
                "Note id '{}' already exists",
                key
            )));
        }

        notes.insert(key.as_str(), encoded.as_slice())?;
        updated.insert((reverse_timestamp_key(note.updated_at), key.as_str()), ())?;
        Ok(())
    }

    /// Fetch a note by id.
    ///
    /// # Returns
    /// `Ok(Some(note))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: ObjectId) -> Result<Option<Note>, AppError> {
        let read_txn = self.db.begin_read()?;
        let notes = read_txn.open_table(NOTES)?;
        let key = id.to_hex();
        match notes.get(key.as_str())? {
            Some(value) => Ok(Some(decode_note(value.value())?)),
            None => Ok(None),
        }
    }

    /// Replace every editable field of a note.
    ///
    /// # Returns
    /// `Ok(Some(note))` when updated, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn replace(&self, id: ObjectId, fields: NoteFields) -> Result<Option<Note>, AppError> {
        let key = id.to_hex();
        let write_txn = self.db.begin_write()?;
        let replaced = {
            let mut notes = write_txn.open_table(NOTES)?;
            let mut updated = write_txn.open_table(NOTES_BY_UPDATED)?;

            let Some(old_guard) = notes.get(key.as_str())? else {
                return Ok(None);
            };
            let mut note = decode_note(old_guard.value())?;
            drop(old_guard);

            let old_recency_key = reverse_timestamp_key(note.updated_at);
            note.replace(fields, Utc::now());
            let new_recency_key = reverse_timestamp_key(note.updated_at);

            let encoded = encode_note(&note)?;
            notes.insert(key.as_str(), encoded.as_slice())?;
            if old_recency_key != new_recency_key {
                let _ = updated.remove((old_recency_key, key.as_str()))?;
            }
            updated.insert((new_recency_key, key.as_str()), ())?;
            note
        };
        write_txn.commit()?;
        Ok(Some(replaced))
    }

    /// Delete a note by id.
    ///
    /// # Returns
    /// `true` when a row was deleted, `false` when it did not exist.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let key = id.to_hex();
        let write_txn = self.db.begin_write()?;
        {
            let mut notes = write_txn.open_table(NOTES)?;
            let mut updated = write_txn.open_table(NOTES_BY_UPDATED)?;

            let Some(old_guard) = notes.remove(key.as_str())? else {
                return Ok(false);
            };
            let note = decode_note(old_guard.value())?;
            drop(old_guard);
            let _ = updated.remove((reverse_timestamp_key(note.updated_at), key.as_str()))?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Return the notes accepted by `filter`, most recently updated first.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn find(&self, filter: &NoteFilter) -> Result<Vec<Note>, AppError> {
        let read_txn = self.db.begin_read()?;
        let updated = read_txn.open_table(NOTES_BY_UPDATED)?;
        let notes = read_txn.open_table(NOTES)?;

        let mut found = Vec::new();
        for item in updated.iter()? {
            let (key, _) = item?;
            let (_, note_id) = key.value();
            let Some(row) = notes.get(note_id)? else {
                continue;
            };
            let note = decode_note(row.value())?;
            if filter.matches(&note) {
                found.push(note);
            }
        }
        Ok(found)
    }

    /// Count stored notes.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<u64, AppError> {
        use redb::ReadableTableMetadata;

        let read_txn = self.db.begin_read()?;
        let notes = read_txn.open_table(NOTES)?;
        Ok(notes.len()?)
    }
}
