//! Built-in graphs: the sample shown for a new project and the starter templates.

use flowboard_config::{
  ActionData, ActionType, BaseData, DecisionData, Edge, Node, NodeData, OutputChannel, Position,
  StartData, TerminalData, Trigger,
};

use crate::labels::build_edge;

fn start(id: &str, x: f64, y: f64, label: &str, description: &str, trigger: Trigger) -> Node {
  Node::new(
    id,
    NodeData::Start(StartData {
      base: BaseData::new(label, description),
      trigger,
    }),
    Position::new(x, y),
  )
}

fn action(
  id: &str,
  x: f64,
  y: f64,
  label: &str,
  description: &str,
  action_type: ActionType,
  endpoint: Option<&str>,
) -> Node {
  Node::new(
    id,
    NodeData::Action(ActionData {
      base: BaseData::new(label, description),
      action_type,
      endpoint: endpoint.map(str::to_string),
    }),
    Position::new(x, y),
  )
}

fn terminal(id: &str, x: f64, y: f64, label: &str, description: &str, output: OutputChannel) -> Node {
  Node::new(
    id,
    NodeData::Terminal(TerminalData {
      base: BaseData::new(label, description),
      output,
    }),
    Position::new(x, y),
  )
}

fn link(nodes: &[Node], source: &str, target: &str, handle: Option<&str>) -> Edge {
  let mut connection = flowboard_config::Connection::new(source, target);
  connection.source_handle = handle.map(str::to_string);
  let source_node = nodes.iter().find(|node| node.id == source);
  let mut edge = build_edge(&connection, source_node);
  edge.id = format!("e{}-{}", source, target);
  edge
}

/// The lead-routing sample: 7 nodes, one decision with two labelled branches.
pub fn default_nodes() -> Vec<Node> {
  vec![
    start(
      "1",
      100.0,
      100.0,
      "Start Workflow",
      "Webhook trigger",
      Trigger::Webhook,
    ),
    action(
      "2",
      100.0,
      280.0,
      "Fetch Lead Data",
      "Enrich account information",
      ActionType::Enrichment,
      Some("/api/enrich"),
    ),
    Node::new(
      "3",
      NodeData::Decision(DecisionData {
        base: BaseData::new("Check Lead Score", "Evaluate lead quality"),
        condition: "score > 80".to_string(),
        true_label: "Hot Lead".to_string(),
        false_label: "Warm Lead".to_string(),
      }),
      Position::new(450.0, 220.0),
    ),
    action(
      "4",
      800.0,
      120.0,
      "AI Personalization",
      "Generate personalized content",
      ActionType::Ai,
      None,
    ),
    terminal(
      "5",
      1100.0,
      120.0,
      "Premium Outreach",
      "Send immediate email",
      OutputChannel::Email,
    ),
    action(
      "6",
      800.0,
      320.0,
      "Standard Queue",
      "Add to nurture sequence",
      ActionType::Transform,
      None,
    ),
    terminal(
      "7",
      1100.0,
      320.0,
      "Standard Outreach",
      "Schedule follow-up",
      OutputChannel::Email,
    ),
  ]
}

/// The six edges of the lead-routing sample.
pub fn default_edges() -> Vec<Edge> {
  let nodes = default_nodes();
  vec![
    link(&nodes, "1", "2", None),
    link(&nodes, "2", "3", None),
    link(&nodes, "3", "4", Some("true")),
    link(&nodes, "4", "5", None),
    link(&nodes, "3", "6", Some("false")),
    link(&nodes, "6", "7", None),
  ]
}

fn enrichment_nodes() -> Vec<Node> {
  vec![
    start(
      "1",
      100.0,
      200.0,
      "Nightly Sync",
      "Runs every night",
      Trigger::Schedule,
    ),
    action(
      "2",
      400.0,
      200.0,
      "Load Contacts",
      "Pull contacts from the CRM",
      ActionType::Api,
      Some("/api/contacts"),
    ),
    action(
      "3",
      700.0,
      200.0,
      "Enrich Profiles",
      "Add company and role data",
      ActionType::Enrichment,
      Some("/api/enrich"),
    ),
    terminal(
      "4",
      1000.0,
      200.0,
      "Update CRM",
      "Write enriched records back",
      OutputChannel::Crm,
    ),
  ]
}

fn enrichment_edges() -> Vec<Edge> {
  let nodes = enrichment_nodes();
  vec![
    link(&nodes, "1", "2", None),
    link(&nodes, "2", "3", None),
    link(&nodes, "3", "4", None),
  ]
}

/// A starter graph offered when creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
  pub id: &'static str,
  pub name: &'static str,
  pub description: &'static str,
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

pub fn templates() -> Vec<Template> {
  vec![
    Template {
      id: "lead-routing",
      name: "Lead Routing",
      description: "Score incoming leads and route hot and warm leads differently",
      nodes: default_nodes(),
      edges: default_edges(),
    },
    Template {
      id: "enrichment-pipeline",
      name: "Enrichment Pipeline",
      description: "Enrich CRM contacts on a schedule",
      nodes: enrichment_nodes(),
      edges: enrichment_edges(),
    },
  ]
}

pub fn find_template(id: &str) -> Option<Template> {
  templates().into_iter().find(|template| template.id == id)
}
