//! Flowboard Config
//!
//! This crate contains the serializable workflow document types for flowboard.
//! These types describe the nodes and edges a user places on the canvas, in the
//! exact JSON shape the project store persists and the import/export files use.
//!
//! Documents can be read from:
//! - Exported `workflow.json` files (`{ "nodes": [...], "edges": [...] }`)
//! - The project store (each project embeds its nodes and edges)
//!
//! Node data is a tagged variant keyed by node type, so every generic operation
//! matches on [`NodeData`] instead of probing fields.

mod document;
mod edge;
mod enums;
mod node;
mod patch;
mod style;

pub use document::WorkflowDocument;
pub use edge::{Branch, Connection, Edge};
pub use enums::{ActionType, OutputChannel, Trigger};
pub use node::{
  ActionData, BaseData, DecisionData, Node, NodeData, NodeKind, Position, StartData, TerminalData,
};
pub use patch::NodeDataPatch;
pub use style::{
  DEFAULT_EDGE_COLOR, EdgeStyle, FALSE_EDGE_COLOR, LabelBgStyle, LabelStyle, Marker, MarkerKind,
  TRUE_EDGE_COLOR,
};
