//! Database layer and transactional helpers for Noteful.

/// Shared storage for uniquely named records (folders and tags).
pub mod named;
/// Note storage helpers.
pub mod note;
/// redb table definitions.
pub mod tables;
/// Cross-table cascading deletes.
pub mod transactions;

pub use named::{FolderDb, NamedDb, TagDb};
pub use note::NoteDb;
pub use transactions::{CascadeOutcome, TransactionOps};

use crate::error::AppError;
use std::path::Path;
use std::sync::Arc;

/// Database handle with typed accessors for each collection.
///
/// Open once per process and share it (it is `Send + Sync`); writers are
/// serialized by redb.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub folders: FolderDb,
    pub tags: TagDb,
    pub notes: NoteDb,
}

impl Database {
    /// Open (or create) the database under the directory `path`.
    ///
    /// # Returns
    /// A fully initialized [`Database`] with every table created.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created or redb fails to
    /// open the file (for example when another process holds it).
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let file = dir.join(tables::REDB_FILE_NAME);
        let db = redb::Database::create(&file).map_err(|err| match err {
            redb::DatabaseError::DatabaseAlreadyOpen => AppError::StorageMessage(format!(
                "Database '{}' is already open in another process.\n\
                 Stop the other Noteful instance, or set DB_PATH to a different location.",
                file.display()
            )),
            other => AppError::from(other),
        })?;
        tracing::debug!("Opened database at {}", file.display());

        Self::from_shared(Arc::new(db))
    }

    /// Build a handle from an already open redb instance.
    ///
    /// # Errors
    /// Returns an error if the tables cannot be initialized.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            folders: FolderDb::new(db.clone())?,
            tags: TagDb::new(db.clone())?,
            notes: NoteDb::new(db.clone())?,
            db,
        })
    }
}

#[cfg(test)]
mod tests;
