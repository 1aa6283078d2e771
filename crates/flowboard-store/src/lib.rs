//! Flowboard Store
//!
//! This crate persists the list of workflow projects. The whole list lives as
//! one JSON array under a single storage key; every operation reads the list,
//! changes it and writes it back.
//!
//! The [`Backend`] trait is the key-value layer underneath. Implementations:
//! - [`MemoryBackend`]: process memory, for tests and scratch sessions
//! - [`FsBackend`]: one JSON file per key in a directory
//! - [`SqliteBackend`]: a single `kv` table in a SQLite database
//!
//! [`ProjectStore`] provides the project CRUD surface on top of a backend.
//! It assumes a single writer: two processes sharing a backend will overwrite
//! each other's changes (last write wins).

mod fs;
mod memory;
mod projects;
mod sqlite;
mod types;

pub use fs::FsBackend;
pub use memory::MemoryBackend;
pub use projects::{DEFAULT_STORAGE_KEY, ProjectStore};
pub use sqlite::SqliteBackend;
pub use types::{Project, ProjectSummary, ProjectUpdate};

use async_trait::async_trait;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// Database migrations failed.
  #[error("migration error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  /// The value stored under a key is not a valid project list.
  #[error("corrupt data under key '{key}': {source}")]
  Corrupt {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  /// The project list could not be serialized.
  #[error("failed to serialize projects: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Key-value storage for serialized values.
#[async_trait]
pub trait Backend: Send + Sync {
  /// Get the value stored under `key`, if any.
  async fn get(&self, key: &str) -> Result<Option<String>, Error>;

  /// Store `value` under `key`, replacing any previous value.
  async fn set(&self, key: &str, value: String) -> Result<(), Error>;
}
