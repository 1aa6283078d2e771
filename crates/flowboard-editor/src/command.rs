use flowboard_config::{Connection, NodeDataPatch, NodeKind, Position};
use flowboard_workflow::{EdgeChange, NodeChange};
use serde::Deserialize;

use crate::shortcuts::KeyEvent;

/// Something the editor surface asks a session to do.
///
/// Commands deserialize from `{"command": "<name>", ...}` so a scripted
/// sequence can be replayed from a JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
  NodesChanged {
    changes: Vec<NodeChange>,
  },
  EdgesChanged {
    changes: Vec<EdgeChange>,
  },
  Connect {
    connection: Connection,
  },
  /// Add a node of `kind` centered under `cursor`.
  AddNode {
    kind: NodeKind,
    cursor: Position,
  },
  UpdateNodeData {
    node_id: String,
    patch: NodeDataPatch,
  },
  DeleteSelected,
  DuplicateSelected,
  RemoveEdge {
    edge_id: String,
  },
  Undo,
  Redo,
  Key {
    event: KeyEvent,
  },
  /// Replace the graph with the contents of a workflow file.
  Import {
    contents: String,
  },
  Rename {
    name: String,
  },
  SwitchProject {
    #[serde(default)]
    project_id: Option<String>,
  },
  Flush,
}
