//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "noteful.redb";

/// Canonical folder rows (`Folder`, bincode-encoded) keyed by hex id.
pub const FOLDERS: TableDefinition<&str, &[u8]> = TableDefinition::new("folders");
/// Unique folder-name index: name -> hex id.
pub const FOLDER_NAMES: TableDefinition<&str, &str> = TableDefinition::new("folder_names");
/// Canonical tag rows (`Tag`, bincode-encoded) keyed by hex id.
pub const TAGS: TableDefinition<&str, &[u8]> = TableDefinition::new("tags");
/// Unique tag-name index: name -> hex id.
pub const TAG_NAMES: TableDefinition<&str, &str> = TableDefinition::new("tag_names");
/// Canonical note rows (`NoteRow`, bincode-encoded) keyed by hex id.
pub const NOTES: TableDefinition<&str, &[u8]> = TableDefinition::new("notes");
/// Recency index ordered by reverse-nanos then id.
pub const NOTES_BY_UPDATED: TableDefinition<(u64, &str), ()> =
    TableDefinition::new("notes_by_updated");
