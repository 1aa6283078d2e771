use std::path::Path;
use std::time::Duration;

use flowboard_store::DEFAULT_STORAGE_KEY;
use flowboard_workflow::DEFAULT_HISTORY_LIMIT;
use serde::Deserialize;

use crate::error::EditorError;

/// Tunables for an editing session. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
  /// Quiet period before pending changes are committed.
  pub debounce_ms: u64,
  /// Snapshots kept for undo; 0 keeps all of them.
  pub history_limit: usize,
  /// Backend key the project list is stored under.
  pub storage_key: String,
  /// Subtracted from the cursor when adding a node, so it lands centered.
  pub cursor_offset: (f64, f64),
  /// Added to a node's position when it is duplicated.
  pub duplicate_offset: (f64, f64),
}

impl EditorConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  /// Read a JSON config file. Missing fields keep their defaults.
  pub async fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(EditorError::Config)
  }
}

impl Default for EditorConfig {
  fn default() -> Self {
    Self {
      debounce_ms: 300,
      history_limit: DEFAULT_HISTORY_LIMIT,
      storage_key: DEFAULT_STORAGE_KEY.to_string(),
      cursor_offset: (100.0, 50.0),
      duplicate_offset: (50.0, 50.0),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_partial_config_keeps_defaults() {
    let config: EditorConfig = serde_json::from_str(r#"{"debounce_ms": 50}"#).unwrap();

    assert_eq!(config.debounce(), Duration::from_millis(50));
    assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    assert_eq!(config.storage_key, "workflow_projects");
    assert_eq!(config.cursor_offset, (100.0, 50.0));
  }

  #[tokio::test]
  async fn test_load_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    tokio::fs::write(&path, "debounce_ms = 5").await.unwrap();

    let err = EditorConfig::load(&path).await.unwrap_err();
    assert!(matches!(err, EditorError::Config(_)));
  }
}
