use std::path::Path;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::{Backend, Error};

/// SQLite-based backend storing each key as a row of the `kv` table.
pub struct SqliteBackend {
  pool: SqlitePool,
}

impl SqliteBackend {
  /// Create a new SQLite backend with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Open (creating if needed) a database file and run migrations.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
    let options = SqliteConnectOptions::new()
      .filename(path)
      .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    let backend = Self::new(pool);
    backend.migrate().await?;
    Ok(backend)
  }

  /// A private in-memory database, migrated and ready.
  ///
  /// The pool is pinned to one connection that never expires, since each
  /// connection to `:memory:` would otherwise see its own empty database.
  pub async fn in_memory() -> Result<Self, Error> {
    let options = SqliteConnectOptions::new().in_memory(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;
    let backend = Self::new(pool);
    backend.migrate().await?;
    Ok(backend)
  }

  /// Run database migrations.
  pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(&self.pool).await
  }
}

#[async_trait]
impl Backend for SqliteBackend {
  async fn get(&self, key: &str) -> Result<Option<String>, Error> {
    let value = sqlx::query_scalar::<_, String>(
      r#"
      SELECT value
      FROM kv
      WHERE key = ?
      "#,
    )
    .bind(key)
    .fetch_optional(&self.pool)
    .await?;

    Ok(value)
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Error> {
    sqlx::query(
      r#"
      INSERT INTO kv (key, value)
      VALUES (?, ?)
      ON CONFLICT (key) DO UPDATE SET value = excluded.value
      "#,
    )
    .bind(key)
    .bind(value)
    .execute(&self.pool)
    .await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_sqlite_backend_upserts() {
    let backend = SqliteBackend::in_memory().await.unwrap();

    assert_eq!(backend.get("key").await.unwrap(), None);

    backend.set("key", "one".to_string()).await.unwrap();
    backend.set("key", "two".to_string()).await.unwrap();
    assert_eq!(backend.get("key").await.unwrap().as_deref(), Some("two"));
  }

  #[tokio::test]
  async fn test_sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowboard.db");

    let backend = SqliteBackend::open(&path).await.unwrap();
    backend.set("key", "kept".to_string()).await.unwrap();
    drop(backend);

    let reopened = SqliteBackend::open(&path).await.unwrap();
    assert_eq!(reopened.get("key").await.unwrap().as_deref(), Some("kept"));
  }
}
