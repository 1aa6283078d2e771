use serde::{Deserialize, Serialize};

use crate::style::{
  DEFAULT_EDGE_COLOR, EdgeStyle, FALSE_EDGE_COLOR, LabelBgStyle, LabelStyle, Marker,
  TRUE_EDGE_COLOR,
};

/// Output port of a decision node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
  True,
  False,
}

impl Branch {
  /// Map a source handle id to a branch. Only `"true"` and `"false"` select one.
  pub fn from_handle(handle: Option<&str>) -> Option<Self> {
    match handle {
      Some("true") => Some(Branch::True),
      Some("false") => Some(Branch::False),
      _ => None,
    }
  }

  pub fn handle(self) -> &'static str {
    match self {
      Branch::True => "true",
      Branch::False => "false",
    }
  }

  /// Label shown when the decision node leaves its branch label empty.
  pub fn fallback_label(self) -> &'static str {
    match self {
      Branch::True => "Yes",
      Branch::False => "No",
    }
  }

  pub fn color(self) -> &'static str {
    match self {
      Branch::True => TRUE_EDGE_COLOR,
      Branch::False => FALSE_EDGE_COLOR,
    }
  }
}

/// A connection request raised by the canvas when the user drags between handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
  pub source: String,
  pub target: String,
  #[serde(default)]
  pub source_handle: Option<String>,
  #[serde(default)]
  pub target_handle: Option<String>,
}

impl Connection {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
      source_handle: None,
      target_handle: None,
    }
  }

  pub fn from_handle(mut self, handle: impl Into<String>) -> Self {
    self.source_handle = Some(handle.into());
    self
  }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
  pub id: String,
  pub source: String,
  pub target: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_handle: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_handle: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(default)]
  pub animated: bool,
  #[serde(default)]
  pub style: EdgeStyle,
  #[serde(default)]
  pub marker_end: Marker,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label_style: Option<LabelStyle>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label_bg_style: Option<LabelBgStyle>,
  #[serde(default, skip_serializing)]
  pub selected: bool,
}

impl Edge {
  /// A plain (non-branch) animated edge.
  pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      source: source.into(),
      target: target.into(),
      source_handle: None,
      target_handle: None,
      label: None,
      animated: true,
      style: EdgeStyle::default(),
      marker_end: Marker::default(),
      label_style: None,
      label_bg_style: None,
      selected: false,
    }
  }

  /// The branch this edge leaves from, judged by its handle alone.
  pub fn branch(&self) -> Option<Branch> {
    Branch::from_handle(self.source_handle.as_deref())
  }

  /// Apply the colors for a decision branch, or the plain colors for `None`.
  pub fn apply_branch_style(&mut self, branch: Option<Branch>) {
    match branch {
      Some(branch) => {
        let color = branch.color();
        self.style = EdgeStyle::colored(color);
        self.marker_end = Marker::arrow_closed(color);
        self.label_style = Some(LabelStyle::branch(color));
        self.label_bg_style = Some(match branch {
          Branch::True => LabelBgStyle::for_true_branch(),
          Branch::False => LabelBgStyle::for_false_branch(),
        });
      }
      None => {
        self.style = EdgeStyle::colored(DEFAULT_EDGE_COLOR);
        self.marker_end = Marker::arrow_closed(DEFAULT_EDGE_COLOR);
        self.label_style = None;
        self.label_bg_style = None;
      }
    }
  }

  pub fn touches(&self, node_id: &str) -> bool {
    self.source == node_id || self.target == node_id
  }

  /// Copy of this edge with interaction state cleared.
  pub fn sanitized(&self) -> Self {
    Self {
      selected: false,
      ..self.clone()
    }
  }
}
