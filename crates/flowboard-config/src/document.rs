use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::node::Node;

/// The standalone `{ nodes, edges }` file used to move a workflow between projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
  #[serde(default)]
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub edges: Vec<Edge>,
}

impl WorkflowDocument {
  /// File name offered when a workflow is exported.
  pub const FILE_NAME: &'static str = "workflow.json";

  pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
    Self { nodes, edges }
  }

  pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(input)
  }

  /// Pretty-printed JSON, as written to an export file.
  pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_collections_default_to_empty() {
    let document = WorkflowDocument::from_json("{}").unwrap();
    assert!(document.nodes.is_empty());
    assert!(document.edges.is_empty());
  }

  #[test]
  fn test_invalid_json_is_an_error() {
    assert!(WorkflowDocument::from_json("{ not json").is_err());
    assert!(WorkflowDocument::from_json(r#"{"nodes": 3}"#).is_err());
  }
}
