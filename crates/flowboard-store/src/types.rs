use chrono::{DateTime, Utc};
use flowboard_config::{Edge, Node};
use serde::{Deserialize, Serialize};

/// A named workflow as stored in the project list.
///
/// Timestamps are written as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub edges: Vec<Edge>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub created_at: DateTime<Utc>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub updated_at: DateTime<Utc>,
}

impl Project {
  pub fn summary(&self) -> ProjectSummary {
    ProjectSummary {
      id: self.id.clone(),
      name: self.name.clone(),
      node_count: self.nodes.len(),
      edge_count: self.edges.len(),
      updated_at: self.updated_at,
    }
  }
}

/// What a project listing shows for each project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
  pub id: String,
  pub name: String,
  pub node_count: usize,
  pub edge_count: usize,
  pub updated_at: DateTime<Utc>,
}

/// Fields to merge into a stored project. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
  pub name: Option<String>,
  pub nodes: Option<Vec<Node>>,
  pub edges: Option<Vec<Edge>>,
}

impl ProjectUpdate {
  pub fn rename(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      ..Default::default()
    }
  }

  pub fn graph(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
    Self {
      name: None,
      nodes: Some(nodes),
      edges: Some(edges),
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub(crate) fn apply_to(self, project: &mut Project) {
    if let Some(name) = self.name {
      project.name = name;
    }
    if let Some(nodes) = self.nodes {
      project.nodes = nodes;
    }
    if let Some(edges) = self.edges {
      project.edges = edges;
    }
  }
}
