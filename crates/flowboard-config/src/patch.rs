use serde::Deserialize;

use crate::enums::{ActionType, OutputChannel, Trigger};
use crate::node::NodeData;

/// A partial update to a node's data, as sent by the node edit dialog.
///
/// Fields that do not exist on the node's type are ignored, which keeps the
/// node type fixed for the node's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeDataPatch {
  pub label: Option<String>,
  pub description: Option<String>,
  pub collapsed: Option<bool>,
  pub trigger: Option<Trigger>,
  pub action_type: Option<ActionType>,
  pub endpoint: Option<String>,
  pub condition: Option<String>,
  pub true_label: Option<String>,
  pub false_label: Option<String>,
  pub output: Option<OutputChannel>,
}

fn merge<T: PartialEq + Clone>(slot: &mut T, value: &Option<T>) -> bool {
  match value {
    Some(value) if slot != value => {
      *slot = value.clone();
      true
    }
    _ => false,
  }
}

impl NodeData {
  /// Shallow-merge `patch` into this data. Returns whether anything changed.
  pub fn apply(&mut self, patch: &NodeDataPatch) -> bool {
    let base = self.base_mut();
    let mut changed = merge(&mut base.label, &patch.label);
    changed |= merge(&mut base.description, &patch.description);
    changed |= merge(&mut base.collapsed, &patch.collapsed);

    match self {
      NodeData::Start(data) => {
        changed |= merge(&mut data.trigger, &patch.trigger);
      }
      NodeData::Action(data) => {
        changed |= merge(&mut data.action_type, &patch.action_type);
        if let Some(endpoint) = &patch.endpoint
          && data.endpoint.as_ref() != Some(endpoint)
        {
          data.endpoint = Some(endpoint.clone());
          changed = true;
        }
      }
      NodeData::Decision(data) => {
        changed |= merge(&mut data.condition, &patch.condition);
        changed |= merge(&mut data.true_label, &patch.true_label);
        changed |= merge(&mut data.false_label, &patch.false_label);
      }
      NodeData::Terminal(data) => {
        changed |= merge(&mut data.output, &patch.output);
      }
    }

    changed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::node::NodeKind;

  #[test]
  fn test_patch_merges_shared_and_typed_fields() {
    let mut data = NodeKind::Decision.default_data();
    let patch = NodeDataPatch {
      label: Some("Score gate".to_string()),
      true_label: Some("Hot".to_string()),
      ..Default::default()
    };

    assert!(data.apply(&patch));
    let decision = data.as_decision().unwrap();
    assert_eq!(decision.base.label, "Score gate");
    assert_eq!(decision.true_label, "Hot");
    assert_eq!(decision.false_label, "No");
    assert_eq!(decision.base.description, "Conditional branch");
  }

  #[test]
  fn test_patch_ignores_fields_of_other_types() {
    let mut data = NodeKind::Start.default_data();
    let patch = NodeDataPatch {
      output: Some(OutputChannel::Slack),
      true_label: Some("ignored".to_string()),
      ..Default::default()
    };

    assert!(!data.apply(&patch));
    assert_eq!(data, NodeKind::Start.default_data());
  }

  #[test]
  fn test_patch_from_json() {
    let patch: NodeDataPatch =
      serde_json::from_str(r#"{"actionType": "api", "endpoint": "/api/score"}"#).unwrap();
    let mut data = NodeKind::Action.default_data();

    assert!(data.apply(&patch));
    match data {
      NodeData::Action(action) => {
        assert_eq!(action.action_type, ActionType::Api);
        assert_eq!(action.endpoint.as_deref(), Some("/api/score"));
      }
      other => panic!("expected action data, got {:?}", other),
    }
  }
}
