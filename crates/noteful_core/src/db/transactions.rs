//! Atomic cross-table deletes that keep note references consistent.

use super::named::{NamedDb, NamedTables};
use super::note::{decode_note, encode_note};
use super::tables::NOTES;
use super::Database;
use crate::error::AppError;
use crate::id::ObjectId;
use crate::models::{folder::Folder, note::Note, tag::Tag};
use redb::ReadableTable;

/// Result of a cascading delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Whether the parent row existed before the delete.
    pub parent_deleted: bool,
    /// Notes whose references were rewritten.
    pub notes_updated: usize,
}

/// Deletes that touch a parent collection and the notes table together.
pub struct TransactionOps;

impl TransactionOps {
    /// Delete a folder and clear `folder_id` on every note that pointed at it.
    ///
    /// The cleanup runs even when the folder row is already gone, so stale
    /// references to the id are removed as well. Note timestamps are left
    /// unchanged.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails; nothing
    /// is committed in that case.
    pub fn delete_folder_and_unfile_notes(
        db: &Database,
        folder_id: ObjectId,
    ) -> Result<CascadeOutcome, AppError> {
        let outcome = Self::delete_with_cascade::<Folder>(db, folder_id, |note| {
            if note.folder_id == Some(folder_id) {
                note.folder_id = None;
                true
            } else {
                false
            }
        })?;
        tracing::info!(
            folder_id = %folder_id,
            existed = outcome.parent_deleted,
            notes_unfiled = outcome.notes_updated,
            "Deleted folder"
        );
        Ok(outcome)
    }

    /// Delete a tag and pull its id from every note's tag set.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails; nothing
    /// is committed in that case.
    pub fn delete_tag_and_strip_notes(
        db: &Database,
        tag_id: ObjectId,
    ) -> Result<CascadeOutcome, AppError> {
        let outcome = Self::delete_with_cascade::<Tag>(db, tag_id, |note| {
            let before = note.tags.len();
            note.tags.retain(|tag| *tag != tag_id);
            note.tags.len() != before
        })?;
        tracing::info!(
            tag_id = %tag_id,
            existed = outcome.parent_deleted,
            notes_untagged = outcome.notes_updated,
            "Deleted tag"
        );
        Ok(outcome)
    }

    fn delete_with_cascade<T: NamedTables>(
        db: &Database,
        parent_id: ObjectId,
        mut detach: impl FnMut(&mut Note) -> bool,
    ) -> Result<CascadeOutcome, AppError> {
        let write_txn = db.db.begin_write()?;
        let outcome = {
            let removed = NamedDb::<T>::remove_in_txn(&write_txn, parent_id)?;

            let mut notes = write_txn.open_table(NOTES)?;
            let mut changed = Vec::new();
            for item in notes.iter()? {
                let (_, value) = item?;
                let mut note = decode_note(value.value())?;
                if detach(&mut note) {
                    changed.push(note);
                }
            }

            // updated_at is untouched, so the recency index needs no rewrite.
            for note in &changed {
                let key = note.id.to_hex();
                let encoded = encode_note(note)?;
                notes.insert(key.as_str(), encoded.as_slice())?;
            }

            CascadeOutcome {
                parent_deleted: removed.is_some(),
                notes_updated: changed.len(),
            }
        };
        write_txn.commit()?;
        Ok(outcome)
    }
}
