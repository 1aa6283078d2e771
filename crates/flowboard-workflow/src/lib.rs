//! Flowboard Workflow
//!
//! This crate holds the in-memory editing model for an open workflow:
//!
//! - [`WorkflowGraph`]: the authoritative node and edge collections with the
//!   structural operations the editor performs (add, update, delete with
//!   cascade, duplicate, connect) and the canvas change events it consumes.
//! - [`sync_edge_labels`]: derives branch edge labels from their decision node.
//! - [`History`]: a bounded, linear undo/redo stack of snapshots.
//! - Seed data: the sample lead-routing graph and the built-in templates.
//!
//! Every operation here is synchronous and total. Ids that do not exist are
//! ignored rather than reported, since the canvas may race with deletions.

mod change;
mod graph;
mod history;
mod ids;
mod labels;
mod seed;

pub use change::{EdgeChange, NodeChange};
pub use graph::WorkflowGraph;
pub use history::{DEFAULT_HISTORY_LIMIT, History, Snapshot};
pub use ids::IdAllocator;
pub use labels::{SyncedEdges, branch_label, build_edge, sync_edge_labels};
pub use seed::{Template, default_edges, default_nodes, find_template, templates};
