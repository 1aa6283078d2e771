//! Editor runner with channel-based commands.
//!
//! The `EditorRunner` owns an mpsc channel of [`EditorCommand`]s and applies
//! them to one `EditorSession`, committing whenever the debounce deadline
//! passes between commands.

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::command::EditorCommand;
use crate::error::EditorError;
use crate::session::EditorSession;

/// A runner that drives an editing session from a command channel.
///
/// # Usage
///
/// ```ignore
/// let runner = EditorRunner::new(session);
///
/// // Hand senders to whatever produces editor events
/// let sender = runner.sender();
///
/// // Run until cancelled or every sender is dropped
/// let cancel = CancellationToken::new();
/// let session = runner.start(cancel).await?;
/// ```
pub struct EditorRunner {
  sender: mpsc::Sender<EditorCommand>,
  receiver: mpsc::Receiver<EditorCommand>,
  session: EditorSession,
}

impl EditorRunner {
  pub fn new(session: EditorSession) -> Self {
    Self::with_buffer_size(session, 100)
  }

  pub fn with_buffer_size(session: EditorSession, buffer_size: usize) -> Self {
    let (sender, receiver) = mpsc::channel(buffer_size);
    Self {
      sender,
      receiver,
      session,
    }
  }

  pub fn sender(&self) -> mpsc::Sender<EditorCommand> {
    self.sender.clone()
  }

  /// Queue a command through the channel.
  pub async fn send(&self, command: EditorCommand) -> Result<(), EditorError> {
    self
      .sender
      .send(command)
      .await
      .map_err(|_| EditorError::ChannelClosed)
  }

  pub fn session(&self) -> &EditorSession {
    &self.session
  }

  /// Run the command loop.
  ///
  /// Commands are applied in arrival order. The loop ends when the token is
  /// cancelled or every sender has been dropped; a pending commit is flushed
  /// before the session is handed back.
  pub async fn start(self, cancel: CancellationToken) -> Result<EditorSession, EditorError> {
    let Self {
      sender,
      mut receiver,
      mut session,
    } = self;
    // Only external senders keep the loop alive.
    drop(sender);

    info!(
      project_id = ?session.project_id(),
      name = %session.name(),
      "starting editor runner"
    );

    loop {
      let deadline = session.pending_deadline();
      tokio::select! {
        biased;
        _ = cancel.cancelled() => {
          info!(project_id = ?session.project_id(), "editor runner cancelled");
          break;
        }
        command = receiver.recv() => {
          match command {
            Some(command) => {
              if let Err(e) = session.execute(command).await {
                warn!(
                  project_id = ?session.project_id(),
                  error = %e,
                  "editor command failed"
                );
              }
            }
            None => {
              info!(project_id = ?session.project_id(), "editor runner channel closed");
              break;
            }
          }
        }
        _ = wait_until(deadline) => {
          if let Err(e) = session.commit_if_due(Instant::now()).await {
            error!(
              project_id = ?session.project_id(),
              error = %e,
              "debounced commit failed"
            );
          }
        }
      }
    }

    session.close().await?;
    Ok(session)
  }
}

async fn wait_until(deadline: Option<Instant>) {
  match deadline {
    Some(deadline) => tokio::time::sleep_until(deadline).await,
    None => std::future::pending().await,
  }
}
