//! Workflow file import and export.

use std::path::{Path, PathBuf};

use flowboard_config::WorkflowDocument;
use tracing::{debug, warn};

use crate::error::EditorError;

/// Parse an imported file. Anything that is not a JSON document with node and
/// edge arrays is rejected as [`EditorError::InvalidImport`].
pub fn parse_import(contents: &str) -> Result<WorkflowDocument, EditorError> {
  WorkflowDocument::from_json(contents).map_err(|source| {
    warn!(error = %source, "rejected workflow file");
    EditorError::InvalidImport { source }
  })
}

/// Pretty-printed JSON for a document.
pub fn render_export(document: &WorkflowDocument) -> Result<String, EditorError> {
  document.to_json_pretty().map_err(EditorError::Export)
}

pub async fn read_import(path: impl AsRef<Path>) -> Result<WorkflowDocument, EditorError> {
  let path = path.as_ref();
  let contents = tokio::fs::read_to_string(path).await?;
  debug!(path = %path.display(), bytes = contents.len(), "read workflow file");
  parse_import(&contents)
}

/// Write `workflow.json` into `dir`, creating it if needed. Returns the file path.
pub async fn write_export(
  dir: impl AsRef<Path>,
  document: &WorkflowDocument,
) -> Result<PathBuf, EditorError> {
  let dir = dir.as_ref();
  tokio::fs::create_dir_all(dir).await?;
  let path = dir.join(WorkflowDocument::FILE_NAME);
  tokio::fs::write(&path, render_export(document)?).await?;
  debug!(path = %path.display(), "exported workflow");
  Ok(path)
}
