//! Shared test-only helpers for noteful_core.

use crate::models::note::{Note, NoteFields};
use crate::{Database, ObjectId};
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Insert a note built from the given fields and return it.
pub(crate) fn insert_note(
    db: &Database,
    title: &str,
    content: Option<&str>,
    folder_id: Option<ObjectId>,
    tags: &[ObjectId],
) -> Note {
    let note = Note::new(NoteFields {
        title: title.to_string(),
        content: content.map(str::to_string),
        folder_id,
        tags: tags.to_vec(),
    });
    db.notes.create(&note).expect("create note");
    note
}
