use serde::{Deserialize, Serialize};

/// How a start node is triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
  #[default]
  Webhook,
  Schedule,
  Manual,
  Event,
}

/// The kind of work an action node performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
  #[default]
  Enrichment,
  Person,
  Ai,
  Api,
  Transform,
}

/// Where a terminal node delivers its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
  #[default]
  Email,
  Slack,
  Crm,
  Webhook,
}
