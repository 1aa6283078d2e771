use std::collections::HashSet;

use flowboard_config::{
  Connection, Edge, Node, NodeDataPatch, NodeKind, Position, WorkflowDocument,
};
use tracing::debug;

use crate::change::{EdgeChange, NodeChange};
use crate::history::Snapshot;
use crate::ids::IdAllocator;
use crate::labels::{SyncedEdges, build_edge, sync_edge_labels};
use crate::seed::{default_edges, default_nodes};

/// Offset applied to duplicated nodes so they don't sit on top of the originals.
const DUPLICATE_OFFSET: (f64, f64) = (50.0, 50.0);

/// The node and edge collections of the open workflow.
///
/// Invariant: every edge's `source` and `target` name a node in `nodes`.
/// Operations that remove nodes also remove the edges touching them.
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
  nodes: Vec<Node>,
  edges: Vec<Edge>,
  ids: IdAllocator,
  duplicate_offset: (f64, f64),
}

impl WorkflowGraph {
  /// Wrap existing collections, dropping edges whose endpoints are missing.
  pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
    let ids = IdAllocator::seeded_from(&nodes);
    let mut graph = Self {
      nodes,
      edges,
      ids,
      duplicate_offset: DUPLICATE_OFFSET,
    };
    graph.prune_dangling_edges();
    graph
  }

  /// The lead-routing sample used for new and unknown projects.
  pub fn sample() -> Self {
    Self::new(default_nodes(), default_edges())
  }

  pub fn with_duplicate_offset(mut self, dx: f64, dy: f64) -> Self {
    self.duplicate_offset = (dx, dy);
    self
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  pub fn node(&self, id: &str) -> Option<&Node> {
    self.nodes.iter().find(|node| node.id == id)
  }

  pub fn edge(&self, id: &str) -> Option<&Edge> {
    self.edges.iter().find(|edge| edge.id == id)
  }

  pub fn ids(&self) -> &IdAllocator {
    &self.ids
  }

  pub fn selected_nodes(&self) -> Vec<&Node> {
    self.nodes.iter().filter(|node| node.selected).collect()
  }

  /// Append a node of `kind` at `position`, filled from the kind's defaults.
  pub fn add_node(&mut self, kind: NodeKind, position: Position) -> Node {
    let node = Node::new(self.ids.allocate(), kind.default_data(), position);
    debug!(node_id = %node.id, kind = %kind, "adding node");
    self.nodes.push(node.clone());
    node
  }

  /// Merge `patch` into a node's data. Unknown ids are ignored.
  pub fn update_node_data(&mut self, node_id: &str, patch: &NodeDataPatch) -> bool {
    match self.nodes.iter_mut().find(|node| node.id == node_id) {
      Some(node) => node.data.apply(patch),
      None => false,
    }
  }

  /// Remove the given nodes and every edge that touches one of them.
  ///
  /// Returns the number of nodes removed.
  pub fn delete_nodes<'a, I>(&mut self, node_ids: I) -> usize
  where
    I: IntoIterator<Item = &'a str>,
  {
    let doomed: HashSet<&str> = node_ids.into_iter().collect();
    if doomed.is_empty() {
      return 0;
    }

    let before = self.nodes.len();
    self.nodes.retain(|node| !doomed.contains(node.id.as_str()));
    let edges_before = self.edges.len();
    self
      .edges
      .retain(|edge| !doomed.contains(edge.source.as_str()) && !doomed.contains(edge.target.as_str()));

    let removed = before - self.nodes.len();
    debug!(
      nodes = removed,
      edges = edges_before - self.edges.len(),
      "deleted nodes"
    );
    removed
  }

  /// Delete every selected node.
  pub fn delete_selected(&mut self) -> usize {
    let selected: Vec<String> = self
      .selected_nodes()
      .into_iter()
      .map(|node| node.id.clone())
      .collect();
    self.delete_nodes(selected.iter().map(String::as_str))
  }

  /// Duplicate `nodes` with fresh ids, offset from the originals.
  ///
  /// Only nodes are copied; edges between them are not.
  pub fn copy_nodes(&mut self, nodes: &[Node]) -> Vec<Node> {
    let (dx, dy) = self.duplicate_offset;
    let copies: Vec<Node> = nodes
      .iter()
      .map(|node| Node::new(self.ids.allocate(), node.data.clone(), node.position.offset(dx, dy)))
      .collect();

    self.nodes.extend(copies.iter().cloned());
    copies
  }

  /// Duplicate the selected nodes. Returns nothing when the selection is empty.
  pub fn duplicate_selected(&mut self) -> Vec<Node> {
    let selected: Vec<Node> = self.selected_nodes().into_iter().cloned().collect();
    if selected.is_empty() {
      return Vec::new();
    }
    self.copy_nodes(&selected)
  }

  /// Add the edge for a canvas connection.
  ///
  /// Returns `None` when an endpoint does not exist or an identical connection
  /// (same endpoints and handles) is already present.
  pub fn connect(&mut self, connection: &Connection) -> Option<Edge> {
    let source = self.node(&connection.source)?;
    self.node(&connection.target)?;

    let duplicate = self.edges.iter().any(|edge| {
      edge.source == connection.source
        && edge.target == connection.target
        && edge.source_handle == connection.source_handle
        && edge.target_handle == connection.target_handle
    });
    if duplicate {
      return None;
    }

    let mut edge = build_edge(connection, Some(source));
    if self.edge(&edge.id).is_some() {
      edge.id = self.unused_edge_id(&edge.id);
    }
    debug!(edge_id = %edge.id, label = ?edge.label, "connecting nodes");
    self.edges.push(edge.clone());
    Some(edge)
  }

  pub fn remove_edge(&mut self, edge_id: &str) -> bool {
    let before = self.edges.len();
    self.edges.retain(|edge| edge.id != edge_id);
    before != self.edges.len()
  }

  /// Apply node change events. Returns whether any change affects the saved graph.
  pub fn apply_node_changes(&mut self, changes: &[NodeChange]) -> bool {
    let mut structural = false;
    for change in changes {
      match change {
        NodeChange::Position {
          id,
          position,
          dragging,
        } => {
          if let Some(node) = self.nodes.iter_mut().find(|node| &node.id == id) {
            if let Some(position) = position {
              node.position = *position;
            }
            node.dragging = *dragging;
            structural = true;
          }
        }
        NodeChange::Select { id, selected } => {
          if let Some(node) = self.nodes.iter_mut().find(|node| &node.id == id) {
            node.selected = *selected;
          }
        }
        NodeChange::Remove { id } => {
          structural |= self.delete_nodes([id.as_str()]) > 0;
        }
      }
    }
    structural
  }

  /// Apply edge change events. Returns whether any change affects the saved graph.
  pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) -> bool {
    let mut structural = false;
    for change in changes {
      match change {
        EdgeChange::Select { id, selected } => {
          if let Some(edge) = self.edges.iter_mut().find(|edge| &edge.id == id) {
            edge.selected = *selected;
          }
        }
        EdgeChange::Remove { id } => {
          structural |= self.remove_edge(id);
        }
      }
    }
    structural
  }

  /// Edges as they should be displayed, with branch labels brought up to date.
  pub fn display_edges(&self) -> SyncedEdges<'_> {
    sync_edge_labels(&self.nodes, &self.edges)
  }

  /// Sanitized copy of the graph for persisting and history.
  ///
  /// Interaction state is cleared and branch labels are synced.
  pub fn snapshot(&self) -> Snapshot {
    let nodes = self.nodes.iter().map(Node::sanitized).collect();
    let edges = self
      .display_edges()
      .edges
      .iter()
      .map(|edge| edge.sanitized())
      .collect();
    Snapshot { nodes, edges }
  }

  pub fn document(&self) -> WorkflowDocument {
    self.snapshot().into()
  }

  /// Replace both collections, e.g. from an undo step or an import.
  ///
  /// The id allocator only moves forward, so ids handed out earlier in the
  /// session are never reissued.
  pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
    self.ids.observe(&nodes);
    self.nodes = nodes;
    self.edges = edges;
    self.prune_dangling_edges();
  }

  /// `base` with the first `~n` suffix no edge uses yet.
  fn unused_edge_id(&self, base: &str) -> String {
    let mut n = 2u64;
    loop {
      let id = format!("{base}~{n}");
      if self.edge(&id).is_none() {
        return id;
      }
      n += 1;
    }
  }

  fn prune_dangling_edges(&mut self) {
    let known: HashSet<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();
    let before = self.edges.len();
    self
      .edges
      .retain(|edge| known.contains(edge.source.as_str()) && known.contains(edge.target.as_str()));
    if before != self.edges.len() {
      debug!(pruned = before - self.edges.len(), "dropped dangling edges");
    }
  }
}

impl Default for WorkflowGraph {
  fn default() -> Self {
    Self::new(Vec::new(), Vec::new())
  }
}
