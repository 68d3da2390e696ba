//! Core domain library for Noteful (config, identifiers, storage, queries).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer and transactions.
pub mod db;
/// Process environment helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Record identifiers.
pub mod id;
/// Data models for API requests and persistence.
pub mod models;
/// Note listing filters.
pub mod query;
/// Fixture loading for development databases.
pub mod seed;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::AppError;
pub use id::ObjectId;
pub use query::NoteFilter;
