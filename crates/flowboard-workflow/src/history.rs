use flowboard_config::{Edge, Node, WorkflowDocument};
use serde::{Deserialize, Serialize};

/// Snapshots kept before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// An immutable point-in-time copy of the whole graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

impl Snapshot {
  /// Copy the given collections. Later changes to them do not reach the snapshot.
  pub fn capture(nodes: &[Node], edges: &[Edge]) -> Self {
    Self {
      nodes: nodes.to_vec(),
      edges: edges.to_vec(),
    }
  }
}

impl From<Snapshot> for WorkflowDocument {
  fn from(snapshot: Snapshot) -> Self {
    WorkflowDocument::new(snapshot.nodes, snapshot.edges)
  }
}

impl From<WorkflowDocument> for Snapshot {
  fn from(document: WorkflowDocument) -> Self {
    Self {
      nodes: document.nodes,
      edges: document.edges,
    }
  }
}

/// Linear undo/redo history.
///
/// A cursor points at the snapshot matching the current graph. Saving after
/// an undo discards every snapshot past the cursor, so there is only ever one
/// timeline. When `limit` is exceeded the oldest snapshot is dropped.
#[derive(Debug, Clone)]
pub struct History {
  entries: Vec<Snapshot>,
  cursor: usize,
  limit: usize,
}

impl History {
  /// An empty history. `limit` of 0 means unbounded.
  pub fn new(limit: usize) -> Self {
    Self {
      entries: Vec::new(),
      cursor: 0,
      limit,
    }
  }

  /// Reset to exactly one snapshot. Call once per loaded project.
  pub fn initialize(&mut self, nodes: &[Node], edges: &[Edge]) {
    self.entries = vec![Snapshot::capture(nodes, edges)];
    self.cursor = 0;
  }

  /// Record the current graph, dropping any redo branch.
  pub fn save(&mut self, nodes: &[Node], edges: &[Edge]) {
    self.push(Snapshot::capture(nodes, edges));
  }

  /// Record an already captured snapshot, dropping any redo branch.
  pub fn push(&mut self, snapshot: Snapshot) {
    if !self.entries.is_empty() {
      self.entries.truncate(self.cursor + 1);
    }
    self.entries.push(snapshot);

    if self.limit > 0 && self.entries.len() > self.limit {
      let overflow = self.entries.len() - self.limit;
      self.entries.drain(..overflow);
    }
    self.cursor = self.entries.len() - 1;
  }

  pub fn can_undo(&self) -> bool {
    self.cursor > 0
  }

  pub fn can_redo(&self) -> bool {
    self.cursor + 1 < self.entries.len()
  }

  /// Step back one snapshot and return it.
  pub fn undo(&mut self) -> Option<&Snapshot> {
    if !self.can_undo() {
      return None;
    }
    self.cursor -= 1;
    self.entries.get(self.cursor)
  }

  /// Step forward one snapshot and return it.
  pub fn redo(&mut self) -> Option<&Snapshot> {
    if !self.can_redo() {
      return None;
    }
    self.cursor += 1;
    self.entries.get(self.cursor)
  }

  /// Step back and hand the restored collections to the callbacks.
  pub fn undo_with<N, E>(&mut self, apply_nodes: N, apply_edges: E) -> bool
  where
    N: FnOnce(Vec<Node>),
    E: FnOnce(Vec<Edge>),
  {
    match self.undo() {
      Some(snapshot) => {
        let snapshot = snapshot.clone();
        apply_nodes(snapshot.nodes);
        apply_edges(snapshot.edges);
        true
      }
      None => false,
    }
  }

  /// Step forward and hand the restored collections to the callbacks.
  pub fn redo_with<N, E>(&mut self, apply_nodes: N, apply_edges: E) -> bool
  where
    N: FnOnce(Vec<Node>),
    E: FnOnce(Vec<Edge>),
  {
    match self.redo() {
      Some(snapshot) => {
        let snapshot = snapshot.clone();
        apply_nodes(snapshot.nodes);
        apply_edges(snapshot.edges);
        true
      }
      None => false,
    }
  }

  pub fn current(&self) -> Option<&Snapshot> {
    self.entries.get(self.cursor)
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl Default for History {
  fn default() -> Self {
    Self::new(DEFAULT_HISTORY_LIMIT)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use flowboard_config::{NodeKind, Position};

  fn graph(ids: &[&str]) -> Vec<Node> {
    ids
      .iter()
      .map(|id| Node::new(*id, NodeKind::Action.default_data(), Position::default()))
      .collect()
  }

  #[test]
  fn test_initialize_resets_to_single_snapshot() {
    let mut history = History::default();
    history.initialize(&graph(&["1"]), &[]);
    history.save(&graph(&["1", "2"]), &[]);
    history.initialize(&graph(&["9"]), &[]);

    assert_eq!(history.len(), 1);
    assert_eq!(history.cursor(), 0);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
  }

  #[test]
  fn test_undo_then_redo_round_trips() {
    let mut history = History::default();
    let a = graph(&["1"]);
    let b = graph(&["1", "2"]);
    history.initialize(&a, &[]);
    history.save(&b, &[]);

    assert_eq!(history.undo().unwrap().nodes, a);
    assert!(history.can_redo());
    assert_eq!(history.redo().unwrap().nodes, b);
    assert!(!history.can_redo());
  }

  #[test]
  fn test_save_after_undo_discards_redo_branch() {
    let mut history = History::default();
    let (a, b, c, d) = (
      graph(&["1"]),
      graph(&["1", "2"]),
      graph(&["1", "2", "3"]),
      graph(&["1", "2", "4"]),
    );
    history.initialize(&a, &[]);
    history.save(&b, &[]);
    history.save(&c, &[]);

    history.undo();
    history.save(&d, &[]);

    assert_eq!(history.len(), 3);
    assert!(!history.can_redo());
    assert_eq!(history.current().unwrap().nodes, d);
    assert_eq!(history.undo().unwrap().nodes, b);
    assert_eq!(history.undo().unwrap().nodes, a);
  }

  #[test]
  fn test_undo_and_redo_at_the_ends_are_no_ops() {
    let mut history = History::default();
    history.initialize(&graph(&["1"]), &[]);

    assert!(history.undo().is_none());
    assert!(history.redo().is_none());
    assert_eq!(history.cursor(), 0);
  }

  #[test]
  fn test_snapshot_is_isolated_from_later_mutation() {
    let mut history = History::default();
    let mut live = graph(&["1"]);
    history.initialize(&[], &[]);
    history.save(&live, &[]);

    live[0].position = Position::new(500.0, 500.0);

    assert_eq!(
      history.current().unwrap().nodes[0].position,
      Position::default()
    );
  }

  #[test]
  fn test_callbacks_receive_restored_collections() {
    let mut history = History::default();
    history.initialize(&graph(&["1"]), &[]);
    history.save(&graph(&["1", "2"]), &[]);

    let mut restored_nodes = Vec::new();
    let mut restored_edges = None;
    let moved = history.undo_with(|n| restored_nodes = n, |e| restored_edges = Some(e));

    assert!(moved);
    assert_eq!(restored_nodes.len(), 1);
    assert_eq!(restored_edges, Some(vec![]));
    assert!(!history.undo_with(|_| panic!("no snapshot"), |_| panic!("no snapshot")));
    assert!(history.redo_with(|n| assert_eq!(n.len(), 2), |_| {}));
  }

  #[test]
  fn test_limit_drops_oldest_snapshots() {
    let mut history = History::new(3);
    history.initialize(&graph(&["1"]), &[]);
    for i in 2..=5 {
      let ids: Vec<String> = (1..=i).map(|n| n.to_string()).collect();
      let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
      history.save(&graph(&ids), &[]);
    }

    assert_eq!(history.len(), 3);
    assert_eq!(history.cursor(), 2);
    history.undo();
    let oldest = history.undo().unwrap();
    assert_eq!(oldest.nodes.len(), 3);
    assert!(!history.can_undo());
  }
}
