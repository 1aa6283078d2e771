use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::{ActionType, OutputChannel, Trigger};

/// Canvas coordinates of a node's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }

  pub fn offset(self, dx: f64, dy: f64) -> Self {
    Self {
      x: self.x + dx,
      y: self.y + dy,
    }
  }
}

/// The four node types a workflow is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  Start,
  Action,
  Decision,
  Terminal,
}

impl NodeKind {
  pub const ALL: [NodeKind; 4] = [
    NodeKind::Start,
    NodeKind::Action,
    NodeKind::Decision,
    NodeKind::Terminal,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      NodeKind::Start => "start",
      NodeKind::Action => "action",
      NodeKind::Decision => "decision",
      NodeKind::Terminal => "terminal",
    }
  }

  /// The data a freshly added node of this kind starts with.
  pub fn default_data(self) -> NodeData {
    match self {
      NodeKind::Start => NodeData::Start(StartData {
        base: BaseData::new("New Start", "Trigger point"),
        trigger: Trigger::Webhook,
      }),
      NodeKind::Action => NodeData::Action(ActionData {
        base: BaseData::new("New Action", "Process data"),
        action_type: ActionType::Enrichment,
        endpoint: None,
      }),
      NodeKind::Decision => NodeData::Decision(DecisionData {
        base: BaseData::new("New Decision", "Conditional branch"),
        condition: "value > 0".to_string(),
        true_label: "Yes".to_string(),
        false_label: "No".to_string(),
      }),
      NodeKind::Terminal => NodeData::Terminal(TerminalData {
        base: BaseData::new("New Terminal", "End point"),
        output: OutputChannel::Email,
      }),
    }
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for NodeKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    NodeKind::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| format!("unknown node type: {}", s))
  }
}

/// Fields every node carries regardless of its type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseData {
  pub label: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub collapsed: bool,
}

impl BaseData {
  pub fn new(label: &str, description: &str) -> Self {
    Self {
      label: label.to_string(),
      description: description.to_string(),
      collapsed: false,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartData {
  #[serde(flatten)]
  pub base: BaseData,
  #[serde(default)]
  pub trigger: Trigger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
  #[serde(flatten)]
  pub base: BaseData,
  #[serde(default)]
  pub action_type: ActionType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionData {
  #[serde(flatten)]
  pub base: BaseData,
  #[serde(default)]
  pub condition: String,
  #[serde(default)]
  pub true_label: String,
  #[serde(default)]
  pub false_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalData {
  #[serde(flatten)]
  pub base: BaseData,
  #[serde(default)]
  pub output: OutputChannel,
}

/// Type-specific node payload, tagged by node type.
///
/// Serializes as `"type": "<kind>", "data": { ... }` next to the node's other
/// fields, which is the layout exported workflow files use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NodeData {
  Start(StartData),
  Action(ActionData),
  Decision(DecisionData),
  Terminal(TerminalData),
}

impl NodeData {
  pub fn kind(&self) -> NodeKind {
    match self {
      NodeData::Start(_) => NodeKind::Start,
      NodeData::Action(_) => NodeKind::Action,
      NodeData::Decision(_) => NodeKind::Decision,
      NodeData::Terminal(_) => NodeKind::Terminal,
    }
  }

  pub fn base(&self) -> &BaseData {
    match self {
      NodeData::Start(data) => &data.base,
      NodeData::Action(data) => &data.base,
      NodeData::Decision(data) => &data.base,
      NodeData::Terminal(data) => &data.base,
    }
  }

  pub fn base_mut(&mut self) -> &mut BaseData {
    match self {
      NodeData::Start(data) => &mut data.base,
      NodeData::Action(data) => &mut data.base,
      NodeData::Decision(data) => &mut data.base,
      NodeData::Terminal(data) => &mut data.base,
    }
  }

  pub fn label(&self) -> &str {
    &self.base().label
  }

  pub fn as_decision(&self) -> Option<&DecisionData> {
    match self {
      NodeData::Decision(data) => Some(data),
      _ => None,
    }
  }
}

/// A workflow step placed on the canvas.
///
/// `selected` and `dragging` mirror interaction state reported by the canvas.
/// They are accepted when reading a document but never written back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: String,
  #[serde(flatten)]
  pub data: NodeData,
  pub position: Position,
  #[serde(default, skip_serializing)]
  pub selected: bool,
  #[serde(default, skip_serializing)]
  pub dragging: bool,
}

impl Node {
  pub fn new(id: impl Into<String>, data: NodeData, position: Position) -> Self {
    Self {
      id: id.into(),
      data,
      position,
      selected: false,
      dragging: false,
    }
  }

  pub fn kind(&self) -> NodeKind {
    self.data.kind()
  }

  /// Copy of this node with interaction state cleared.
  pub fn sanitized(&self) -> Self {
    Self {
      selected: false,
      dragging: false,
      ..self.clone()
    }
  }
}
