//! Flowboard Editor
//!
//! This crate drives an editing session over one workflow project. It consumes
//! the events the canvas raises, keeps the in-memory graph and its undo history
//! in step, and persists the graph to the project store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       EditorRunner                          │
//! │  - owns mpsc channel of EditorCommand                       │
//! │  - commits when the debounce deadline passes                │
//! │  - flushes and exits on cancel or channel close             │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      EditorSession                          │
//! │  - WorkflowGraph (nodes, edges, id allocator)               │
//! │  - History (undo/redo snapshots)                            │
//! │  - Debouncer (one pending commit per quiet period)          │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ProjectStore                           │
//! │  - whole-list read/modify/write over a Backend              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Canvas changes and node edits are debounced: a burst of them produces one
//! store write and one history entry once the burst goes quiet. Connecting
//! nodes, removing an edge and importing commit straight away. Undo and redo
//! skip the debounce and restore a snapshot directly.
//!
//! # Usage
//!
//! ```ignore
//! use flowboard_editor::{EditorConfig, EditorRunner, EditorSession};
//! use tokio_util::sync::CancellationToken;
//!
//! let session = EditorSession::open(store, Some("1718000000000"), EditorConfig::default()).await?;
//! let runner = EditorRunner::new(session);
//! let sender = runner.sender();
//!
//! let cancel = CancellationToken::new();
//! let session = runner.start(cancel).await?;
//! ```

mod command;
mod config;
mod debounce;
mod error;
mod runner;
mod session;
mod shortcuts;
mod transfer;

pub use command::EditorCommand;
pub use config::EditorConfig;
pub use debounce::Debouncer;
pub use error::EditorError;
pub use runner::EditorRunner;
pub use session::{EditorSession, LoadedProject, NEW_PROJECT_NAME, load_project};
pub use shortcuts::{KeyEvent, ShortcutAction};
pub use transfer::{parse_import, read_import, render_export, write_export};
