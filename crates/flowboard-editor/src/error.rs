//! Editor error types.

/// Errors that can occur while editing a workflow.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
  /// An imported file is not a workflow document. The message is shown to the
  /// user as-is; the graph is left untouched.
  #[error("Invalid workflow file")]
  InvalidImport {
    #[source]
    source: serde_json::Error,
  },

  /// The workflow could not be serialized for export.
  #[error("failed to serialize workflow: {0}")]
  Export(#[source] serde_json::Error),

  /// The editor config file could not be parsed.
  #[error("invalid editor config: {0}")]
  Config(#[source] serde_json::Error),

  /// Reading or writing the project store failed.
  #[error("storage error: {0}")]
  Store(#[from] flowboard_store::Error),

  /// A file could not be read or written.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The runner has stopped and no longer accepts commands.
  #[error("editor runner channel closed")]
  ChannelClosed,
}
