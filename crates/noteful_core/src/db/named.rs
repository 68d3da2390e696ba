//! Storage for records with a unique name (folders and tags).
//!
//! Each collection keeps a canonical row table keyed by hex id and a
//! `name -> id` index. The index is checked and written inside the same write
//! transaction as the row, and redb admits one writer at a time, so two
//! records can never commit with the same name.

use super::tables::{FOLDERS, FOLDER_NAMES, TAGS, TAG_NAMES};
use crate::error::AppError;
use crate::id::ObjectId;
use crate::models::{folder::Folder, tag::Tag, NamedRecord};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use std::marker::PhantomData;
use std::sync::Arc;

/// Binds a [`NamedRecord`] type to its row and name-index tables.
pub trait NamedTables: NamedRecord {
    const ROWS: TableDefinition<'static, &'static str, &'static [u8]>;
    const NAMES: TableDefinition<'static, &'static str, &'static str>;
}

impl NamedTables for Folder {
    const ROWS: TableDefinition<'static, &'static str, &'static [u8]> = FOLDERS;
    const NAMES: TableDefinition<'static, &'static str, &'static str> = FOLDER_NAMES;
}

impl NamedTables for Tag {
    const ROWS: TableDefinition<'static, &'static str, &'static [u8]> = TAGS;
    const NAMES: TableDefinition<'static, &'static str, &'static str> = TAG_NAMES;
}

/// Accessor for the `folders` tables.
pub type FolderDb = NamedDb<Folder>;
/// Accessor for the `tags` tables.
pub type TagDb = NamedDb<Tag>;

/// Typed accessor for one named collection.
pub struct NamedDb<T> {
    db: Arc<redb::Database>,
    _record: PhantomData<fn() -> T>,
}

fn name_taken<T: NamedTables>() -> AppError {
    AppError::UniqueViolation {
        entity: T::ENTITY,
        field: "name",
    }
}

impl<T: NamedTables> NamedDb<T> {
    /// Initialize the row and name tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(T::ROWS)?;
        write_txn.open_table(T::NAMES)?;
        write_txn.commit()?;
        Ok(Self {
            db,
            _record: PhantomData,
        })
    }

    /// Insert a new record.
    ///
    /// # Errors
    /// Returns [`AppError::UniqueViolation`] when the name is already used,
    /// or a storage error when the id exists or the write fails.
    pub fn create(&self, record: &T) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        Self::insert_in_txn(&write_txn, record)?;
        write_txn.commit()?;
        Ok(())
    }

    /// Insert `record` and its name-index entry inside `write_txn`.
    pub(crate) fn insert_in_txn(write_txn: &WriteTransaction, record: &T) -> Result<(), AppError> {
        let key = record.id().to_hex();
        let encoded = bincode::serialize(record)?;

        let mut rows = write_txn.open_table(T::ROWS)?;
        let mut names = write_txn.open_table(T::NAMES)?;

        if names.get(record.name())?.is_some() {
            return Err(name_taken::<T>());
        }
        if rows.get(key.as_str())?.is_some() {
            return Err(AppError::StorageMessage(format!(
                "{} id '{}' already exists",
                T::ENTITY,
                key
            )));
        }

        rows.insert(key.as_str(), encoded.as_slice())?;
        names.insert(record.name(), key.as_str())?;
        Ok(())
    }

    /// Fetch a record by id.
    ///
    /// # Returns
    /// `Ok(Some(record))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: ObjectId) -> Result<Option<T>, AppError> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(T::ROWS)?;
        let key = id.to_hex();
        match rows.get(key.as_str())? {
            Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
            None => Ok(None),
        }
    }

    /// List every record ordered by name.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<T>, AppError> {
        let read_txn = self.db.begin_read()?;
        let names = read_txn.open_table(T::NAMES)?;
        let rows = read_txn.open_table(T::ROWS)?;

        let mut records = Vec::new();
        for item in names.iter()? {
            let (name, id) = item?;
            let Some(row) = rows.get(id.value())? else {
                tracing::warn!(
                    "{} name index entry '{}' points at missing row {}",
                    T::ENTITY,
                    name.value(),
                    id.value()
                );
                continue;
            };
            records.push(bincode::deserialize(row.value())?);
        }
        Ok(records)
    }

    /// Rename a record.
    ///
    /// Renaming to the current name is accepted and only bumps `updated_at`.
    ///
    /// # Returns
    /// `Ok(Some(record))` when updated, `Ok(None)` when the id does not exist.
    ///
    /// # Errors
    /// Returns [`AppError::UniqueViolation`] when another record owns the
    /// name, or a storage/serialization error.
    pub fn rename(&self, id: ObjectId, name: String) -> Result<Option<T>, AppError> {
        let key = id.to_hex();
        let write_txn = self.db.begin_write()?;
        let renamed = {
            let mut rows = write_txn.open_table(T::ROWS)?;
            let mut names = write_txn.open_table(T::NAMES)?;

            let Some(old_guard) = rows.get(key.as_str())? else {
                return Ok(None);
            };
            let mut record: T = bincode::deserialize(old_guard.value())?;
            drop(old_guard);

            if record.name() != name {
                if let Some(owner) = names.get(name.as_str())? {
                    if owner.value() != key {
                        return Err(name_taken::<T>());
                    }
                }
                let _ = names.remove(record.name())?;
                names.insert(name.as_str(), key.as_str())?;
            }

            record.rename(name, Utc::now());
            let encoded = bincode::serialize(&record)?;
            rows.insert(key.as_str(), encoded.as_slice())?;
            record
        };
        write_txn.commit()?;
        Ok(Some(renamed))
    }

    /// Remove the row and its name-index entry inside `write_txn`.
    ///
    /// # Returns
    /// The removed record, or `None` when the id was not present.
    pub(crate) fn remove_in_txn(
        write_txn: &WriteTransaction,
        id: ObjectId,
    ) -> Result<Option<T>, AppError> {
        let key = id.to_hex();
        let mut rows = write_txn.open_table(T::ROWS)?;
        let mut names = write_txn.open_table(T::NAMES)?;

        let removed: Option<T> = match rows.remove(key.as_str())? {
            Some(old) => Some(bincode::deserialize(old.value())?),
            None => None,
        };
        if let Some(record) = removed.as_ref() {
            let _ = names.remove(record.name())?;
        }
        Ok(removed)
    }
}
