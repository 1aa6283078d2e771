//! Change events raised by the canvas.

use flowboard_config::Position;
use serde::Deserialize;

/// A change to one node reported by the canvas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
  /// The node moved. `dragging` is true while a drag gesture is still in progress.
  Position {
    id: String,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    dragging: bool,
  },
  Select {
    id: String,
    selected: bool,
  },
  Remove {
    id: String,
  },
}

impl NodeChange {
  pub fn id(&self) -> &str {
    match self {
      NodeChange::Position { id, .. } | NodeChange::Select { id, .. } | NodeChange::Remove { id } => {
        id
      }
    }
  }

  /// Whether this change alters the persisted graph (selection does not).
  pub fn is_structural(&self) -> bool {
    !matches!(self, NodeChange::Select { .. })
  }
}

/// A change to one edge reported by the canvas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
  Select { id: String, selected: bool },
  Remove { id: String },
}

impl EdgeChange {
  pub fn is_structural(&self) -> bool {
    matches!(self, EdgeChange::Remove { .. })
  }
}
