//! Branch labels on edges leaving decision nodes.
//!
//! An edge leaving a decision node through its `true` or `false` handle shows
//! the decision node's current branch label. The label on the edge is derived,
//! never edited directly, so it is recomputed from the nodes whenever either
//! collection changes.

use std::borrow::Cow;
use std::collections::HashMap;

use flowboard_config::{Branch, Connection, DecisionData, Edge, Node};

/// The label a branch edge should display for `decision`.
pub fn branch_label(decision: &DecisionData, branch: Branch) -> String {
  let label = match branch {
    Branch::True => &decision.true_label,
    Branch::False => &decision.false_label,
  };
  if label.is_empty() {
    branch.fallback_label().to_string()
  } else {
    label.clone()
  }
}

/// `e{source}-{target}`, followed by `:{source_handle}` and `:{target_handle}`
/// for whichever handles the connection uses.
fn edge_id(connection: &Connection) -> String {
  let mut id = format!("e{}-{}", connection.source, connection.target);
  match (&connection.source_handle, &connection.target_handle) {
    (None, None) => {}
    (Some(source), None) => id.push_str(&format!(":{source}")),
    (source, Some(target)) => {
      id.push_str(&format!(":{}:{target}", source.as_deref().unwrap_or("")));
    }
  }
  id
}

/// Build the edge for a new connection.
///
/// When the source is a decision node and the connection leaves through a
/// branch handle, the edge takes that branch's label and colors. Everything
/// else gets the plain style.
pub fn build_edge(connection: &Connection, source: Option<&Node>) -> Edge {
  let mut edge = Edge::new(edge_id(connection), &connection.source, &connection.target);
  edge.source_handle = connection.source_handle.clone();
  edge.target_handle = connection.target_handle.clone();

  let decision = source.and_then(|node| node.data.as_decision());
  let branch = decision.and(edge.branch());
  edge.apply_branch_style(branch);
  if let (Some(decision), Some(branch)) = (decision, branch) {
    edge.label = Some(branch_label(decision, branch));
  }

  edge
}

/// Edges with labels brought up to date, plus whether any label moved.
///
/// Edges whose label was already correct are borrowed, not copied.
#[derive(Debug)]
pub struct SyncedEdges<'a> {
  pub edges: Vec<Cow<'a, Edge>>,
  pub changed: bool,
}

impl SyncedEdges<'_> {
  pub fn into_owned(self) -> Vec<Edge> {
    self.edges.into_iter().map(Cow::into_owned).collect()
  }
}

/// Recompute branch labels for every edge leaving a decision node.
///
/// Edges from any other node type keep their label untouched.
pub fn sync_edge_labels<'a>(nodes: &[Node], edges: &'a [Edge]) -> SyncedEdges<'a> {
  let decisions: HashMap<&str, &DecisionData> = nodes
    .iter()
    .filter_map(|node| node.data.as_decision().map(|d| (node.id.as_str(), d)))
    .collect();

  let mut changed = false;
  let edges = edges
    .iter()
    .map(|edge| {
      let expected = decisions
        .get(edge.source.as_str())
        .zip(edge.branch())
        .map(|(decision, branch)| branch_label(decision, branch));

      match expected {
        Some(label) if edge.label.as_deref() != Some(label.as_str()) => {
          changed = true;
          let mut updated = edge.clone();
          updated.label = Some(label);
          Cow::Owned(updated)
        }
        _ => Cow::Borrowed(edge),
      }
    })
    .collect();

  SyncedEdges { edges, changed }
}

#[cfg(test)]
mod tests {
  use super::*;
  use flowboard_config::{NodeDataPatch, NodeKind, Position, TRUE_EDGE_COLOR};

  use crate::seed::{default_edges, default_nodes};

  #[test]
  fn test_branch_edge_follows_renamed_true_label() {
    let mut nodes = default_nodes();
    let edges = default_edges();
    let decision = nodes.iter_mut().find(|n| n.id == "3").unwrap();
    decision.data.apply(&NodeDataPatch {
      true_label: Some("VIP".to_string()),
      ..Default::default()
    });

    let synced = sync_edge_labels(&nodes, &edges);
    assert!(synced.changed);

    let edges = synced.into_owned();
    let hot = edges.iter().find(|e| e.id == "e3-4").unwrap();
    let warm = edges.iter().find(|e| e.id == "e3-6").unwrap();
    assert_eq!(hot.label.as_deref(), Some("VIP"));
    assert_eq!(warm.label.as_deref(), Some("Warm Lead"));
  }

  #[test]
  fn test_unchanged_edges_are_borrowed() {
    let nodes = default_nodes();
    let edges = default_edges();

    let synced = sync_edge_labels(&nodes, &edges);
    assert!(!synced.changed);
    assert!(
      synced
        .edges
        .iter()
        .all(|edge| matches!(edge, Cow::Borrowed(_)))
    );
  }

  #[test]
  fn test_empty_branch_label_falls_back() {
    let mut nodes = default_nodes();
    let decision = nodes.iter_mut().find(|n| n.id == "3").unwrap();
    decision.data.apply(&NodeDataPatch {
      false_label: Some(String::new()),
      ..Default::default()
    });

    let edges = sync_edge_labels(&nodes, &default_edges()).into_owned();
    let warm = edges.iter().find(|e| e.id == "e3-6").unwrap();
    assert_eq!(warm.label.as_deref(), Some("No"));
  }

  #[test]
  fn test_non_decision_source_is_never_relabelled() {
    let nodes = vec![
      Node::new("1", NodeKind::Action.default_data(), Position::default()),
      Node::new("2", NodeKind::Terminal.default_data(), Position::default()),
    ];
    let mut edge = Edge::new("e1-2", "1", "2");
    edge.source_handle = Some("true".to_string());
    edge.label = Some("custom".to_string());

    let edges = [edge];
    let synced = sync_edge_labels(&nodes, &edges);
    assert!(!synced.changed);
    assert_eq!(synced.edges[0].label.as_deref(), Some("custom"));
  }

  #[test]
  fn test_build_edge_from_decision_true_handle() {
    let decision = Node::new("3", NodeKind::Decision.default_data(), Position::default());
    let connection = Connection::new("3", "4").from_handle("true");

    let edge = build_edge(&connection, Some(&decision));
    assert_eq!(edge.label.as_deref(), Some("Yes"));
    assert_eq!(edge.style.stroke, TRUE_EDGE_COLOR);
    assert!(edge.animated);
  }

  #[test]
  fn test_edge_id_includes_both_handles() {
    let source = Node::new("1", NodeKind::Start.default_data(), Position::default());
    let mut connection = Connection::new("1", "2");
    connection.target_handle = Some("in".to_string());
    assert_eq!(build_edge(&connection, Some(&source)).id, "e1-2::in");

    let connection = connection.from_handle("out");
    assert_eq!(build_edge(&connection, Some(&source)).id, "e1-2:out:in");
  }

  #[test]
  fn test_build_edge_from_plain_source() {
    let source = Node::new("1", NodeKind::Start.default_data(), Position::default());
    let edge = build_edge(&Connection::new("1", "2"), Some(&source));

    assert_eq!(edge.id, "e1-2");
    assert_eq!(edge.label, None);
    assert!(edge.label_style.is_none());
  }
}
