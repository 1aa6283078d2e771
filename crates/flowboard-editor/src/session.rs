use std::path::{Path, PathBuf};

use flowboard_config::{Connection, Edge, Node, NodeDataPatch, NodeKind, Position};
use flowboard_store::{ProjectStore, ProjectUpdate};
use flowboard_workflow::{
  EdgeChange, History, NodeChange, Snapshot, WorkflowGraph, default_edges, default_nodes,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::command::EditorCommand;
use crate::config::EditorConfig;
use crate::debounce::Debouncer;
use crate::error::EditorError;
use crate::shortcuts::{KeyEvent, ShortcutAction};
use crate::transfer::{parse_import, read_import, render_export, write_export};

/// Name shown when no stored project matches the requested id.
pub const NEW_PROJECT_NAME: &str = "New Workflow";

/// A project's name and graph as loaded into the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
  pub name: String,
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
  /// False when the sample graph was substituted for a missing project.
  pub found: bool,
}

/// Load a project's graph, falling back to the sample graph when the id is
/// absent or unknown.
pub async fn load_project(
  store: &ProjectStore,
  project_id: Option<&str>,
) -> Result<LoadedProject, EditorError> {
  if let Some(id) = project_id {
    if let Some(project) = store.get_project(id).await? {
      return Ok(LoadedProject {
        name: project.name,
        nodes: project.nodes,
        edges: project.edges,
        found: true,
      });
    }
    warn!(project_id = %id, "project not found, loading sample workflow");
  }

  Ok(LoadedProject {
    name: NEW_PROJECT_NAME.to_string(),
    nodes: default_nodes(),
    edges: default_edges(),
    found: false,
  })
}

/// One open project: its working graph, undo history and pending commit.
///
/// Every mutation either schedules a debounced commit or commits right away.
/// A commit writes the graph back to the store and then pushes a sanitized
/// snapshot onto the history. Without a project id (or with an unknown one) commits
/// still reach the history but nothing is written.
pub struct EditorSession {
  store: ProjectStore,
  config: EditorConfig,
  project_id: Option<String>,
  name: String,
  graph: WorkflowGraph,
  history: History,
  debouncer: Debouncer,
}

impl EditorSession {
  pub async fn open(
    store: ProjectStore,
    project_id: Option<&str>,
    config: EditorConfig,
  ) -> Result<Self, EditorError> {
    let loaded = load_project(&store, project_id).await?;
    let mut session = Self {
      debouncer: Debouncer::new(config.debounce()),
      history: History::new(config.history_limit),
      graph: WorkflowGraph::default(),
      name: String::new(),
      project_id: None,
      store,
      config,
    };
    session.install(project_id, loaded);
    Ok(session)
  }

  fn install(&mut self, project_id: Option<&str>, loaded: LoadedProject) {
    let (dx, dy) = self.config.duplicate_offset;
    self.graph = WorkflowGraph::new(loaded.nodes, loaded.edges).with_duplicate_offset(dx, dy);
    // History starts from the graph as loaded, once per project.
    let snapshot = self.graph.snapshot();
    self.history.initialize(&snapshot.nodes, &snapshot.edges);
    self.project_id = project_id.filter(|_| loaded.found).map(str::to_string);
    self.name = loaded.name;

    info!(
      project_id = ?self.project_id,
      name = %self.name,
      nodes = self.graph.nodes().len(),
      edges = self.graph.edges().len(),
      "opened project"
    );
  }

  /// Id of the stored project being edited, if any.
  pub fn project_id(&self) -> Option<&str> {
    self.project_id.as_deref()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn graph(&self) -> &WorkflowGraph {
    &self.graph
  }

  pub fn history(&self) -> &History {
    &self.history
  }

  pub fn config(&self) -> &EditorConfig {
    &self.config
  }

  pub fn store(&self) -> &ProjectStore {
    &self.store
  }

  pub fn can_undo(&self) -> bool {
    self.history.can_undo()
  }

  pub fn can_redo(&self) -> bool {
    self.history.can_redo()
  }

  /// When the pending commit fires, if one is scheduled.
  pub fn pending_deadline(&self) -> Option<Instant> {
    self.debouncer.deadline()
  }

  pub fn has_pending(&self) -> bool {
    self.debouncer.is_pending()
  }

  /// Edges with branch labels synced to their decision nodes.
  pub fn display_edges(&self) -> Vec<Edge> {
    self.graph.display_edges().into_owned()
  }

  // Debounced mutations.

  /// Apply canvas node changes. Moves restart the quiet period whether or not
  /// the drag has ended; selection alone never schedules a commit.
  pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
    if self.graph.apply_node_changes(changes) {
      self.schedule();
    }
  }

  pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
    if self.graph.apply_edge_changes(changes) {
      self.schedule();
    }
  }

  /// Add a node with its default data at exactly `position`.
  pub fn add_node(&mut self, kind: NodeKind, position: Position) -> Node {
    let node = self.graph.add_node(kind, position);
    self.schedule();
    node
  }

  /// Add a node centered under the cursor.
  pub fn add_node_at_cursor(&mut self, kind: NodeKind, cursor: Position) -> Node {
    let (dx, dy) = self.config.cursor_offset;
    self.add_node(kind, cursor.offset(-dx, -dy))
  }

  pub fn update_node_data(&mut self, node_id: &str, patch: &NodeDataPatch) -> bool {
    let updated = self.graph.update_node_data(node_id, patch);
    if updated {
      self.schedule();
    }
    updated
  }

  pub fn delete_nodes<'a, I>(&mut self, node_ids: I) -> usize
  where
    I: IntoIterator<Item = &'a str>,
  {
    let removed = self.graph.delete_nodes(node_ids);
    if removed > 0 {
      self.schedule();
    }
    removed
  }

  pub fn delete_selected(&mut self) -> usize {
    let removed = self.graph.delete_selected();
    if removed > 0 {
      self.schedule();
    }
    removed
  }

  pub fn duplicate_selected(&mut self) -> Vec<Node> {
    let copies = self.graph.duplicate_selected();
    if !copies.is_empty() {
      self.schedule();
    }
    copies
  }

  // Immediate mutations.

  /// Connect two nodes and commit. Returns `None` when the connection was rejected.
  pub async fn connect(&mut self, connection: &Connection) -> Result<Option<Edge>, EditorError> {
    let Some(edge) = self.graph.connect(connection) else {
      return Ok(None);
    };
    self.commit().await?;
    Ok(Some(edge))
  }

  /// Remove one edge and commit. Returns whether it existed.
  pub async fn remove_edge(&mut self, edge_id: &str) -> Result<bool, EditorError> {
    if !self.graph.remove_edge(edge_id) {
      return Ok(false);
    }
    self.commit().await?;
    Ok(true)
  }

  /// Replace the graph with an imported document and commit.
  ///
  /// An invalid file leaves the graph as it was.
  pub async fn import_json(&mut self, contents: &str) -> Result<(), EditorError> {
    let document = parse_import(contents)?;
    self.graph.replace(document.nodes, document.edges);
    info!(
      nodes = self.graph.nodes().len(),
      edges = self.graph.edges().len(),
      "imported workflow"
    );
    self.commit().await
  }

  pub async fn import_file(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
    let document = read_import(path).await?;
    self.graph.replace(document.nodes, document.edges);
    info!(
      nodes = self.graph.nodes().len(),
      edges = self.graph.edges().len(),
      "imported workflow file"
    );
    self.commit().await
  }

  pub fn export_json(&self) -> Result<String, EditorError> {
    render_export(&self.graph.document())
  }

  /// Write the current graph to `dir/workflow.json`.
  pub async fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, EditorError> {
    write_export(dir, &self.graph.document()).await
  }

  pub async fn rename(&mut self, name: &str) -> Result<(), EditorError> {
    self.name = name.to_string();
    if let Some(id) = &self.project_id {
      self.store.rename_project(id, name).await?;
    }
    Ok(())
  }

  // History.

  /// Step back one snapshot. Drops any pending commit, since the restored
  /// snapshot replaces whatever it would have saved.
  pub async fn undo(&mut self) -> Result<bool, EditorError> {
    self.debouncer.cancel();
    let Some(snapshot) = self.history.undo().cloned() else {
      return Ok(false);
    };
    debug!(cursor = self.history.cursor(), "undo");
    self.restore(snapshot).await?;
    Ok(true)
  }

  pub async fn redo(&mut self) -> Result<bool, EditorError> {
    self.debouncer.cancel();
    let Some(snapshot) = self.history.redo().cloned() else {
      return Ok(false);
    };
    debug!(cursor = self.history.cursor(), "redo");
    self.restore(snapshot).await?;
    Ok(true)
  }

  async fn restore(&mut self, snapshot: Snapshot) -> Result<(), EditorError> {
    self.graph.replace(snapshot.nodes.clone(), snapshot.edges.clone());
    self.persist(snapshot).await
  }

  /// Run the action bound to a key press. Returns the action, if any.
  pub async fn handle_key(&mut self, event: &KeyEvent) -> Result<Option<ShortcutAction>, EditorError> {
    let Some(action) = ShortcutAction::resolve(event) else {
      return Ok(None);
    };
    match action {
      ShortcutAction::Undo => {
        self.undo().await?;
      }
      ShortcutAction::Redo => {
        self.redo().await?;
      }
      ShortcutAction::Duplicate => {
        self.duplicate_selected();
      }
    }
    Ok(Some(action))
  }

  pub async fn execute(&mut self, command: EditorCommand) -> Result<(), EditorError> {
    match command {
      EditorCommand::NodesChanged { changes } => self.apply_node_changes(&changes),
      EditorCommand::EdgesChanged { changes } => self.apply_edge_changes(&changes),
      EditorCommand::Connect { connection } => {
        self.connect(&connection).await?;
      }
      EditorCommand::AddNode { kind, cursor } => {
        self.add_node_at_cursor(kind, cursor);
      }
      EditorCommand::UpdateNodeData { node_id, patch } => {
        self.update_node_data(&node_id, &patch);
      }
      EditorCommand::DeleteSelected => {
        self.delete_selected();
      }
      EditorCommand::DuplicateSelected => {
        self.duplicate_selected();
      }
      EditorCommand::RemoveEdge { edge_id } => {
        self.remove_edge(&edge_id).await?;
      }
      EditorCommand::Undo => {
        self.undo().await?;
      }
      EditorCommand::Redo => {
        self.redo().await?;
      }
      EditorCommand::Key { event } => {
        self.handle_key(&event).await?;
      }
      EditorCommand::Import { contents } => self.import_json(&contents).await?,
      EditorCommand::Rename { name } => self.rename(&name).await?,
      EditorCommand::SwitchProject { project_id } => {
        self.switch_project(project_id.as_deref()).await?
      }
      EditorCommand::Flush => {
        self.flush().await?;
      }
    }
    Ok(())
  }

  // Commit pipeline.

  /// Commit if the quiet period has passed. Returns whether a commit ran.
  pub async fn commit_if_due(&mut self, now: Instant) -> Result<bool, EditorError> {
    if !self.debouncer.take_due(now) {
      return Ok(false);
    }
    self.commit_snapshot().await?;
    Ok(true)
  }

  /// Commit a pending change now instead of waiting out the quiet period.
  pub async fn flush(&mut self) -> Result<bool, EditorError> {
    if !self.debouncer.flush() {
      return Ok(false);
    }
    debug!(project_id = ?self.project_id, "flushing pending commit");
    self.commit_snapshot().await?;
    Ok(true)
  }

  /// Open another project. The pending commit is written to the current
  /// project first, so nothing lands on the new one.
  pub async fn switch_project(&mut self, project_id: Option<&str>) -> Result<(), EditorError> {
    self.flush().await?;
    let loaded = load_project(&self.store, project_id).await?;
    self.install(project_id, loaded);
    Ok(())
  }

  /// Flush any pending commit before the session goes away.
  pub async fn close(&mut self) -> Result<(), EditorError> {
    self.flush().await?;
    info!(project_id = ?self.project_id, "closed project");
    Ok(())
  }

  fn schedule(&mut self) {
    let deadline = self.debouncer.touch();
    debug!(?deadline, "commit scheduled");
  }

  /// Commit straight away, dropping any pending deadline it supersedes.
  async fn commit(&mut self) -> Result<(), EditorError> {
    self.debouncer.cancel();
    self.commit_snapshot().await
  }

  /// Write the current graph, then record it in history.
  ///
  /// A failed write leaves history untouched and re-arms the debounce so the
  /// change is retried after the next quiet period.
  async fn commit_snapshot(&mut self) -> Result<(), EditorError> {
    let snapshot = self.graph.snapshot();
    if let Err(e) = self.persist(snapshot.clone()).await {
      self.debouncer.touch();
      return Err(e);
    }
    self.history.push(snapshot);
    debug!(
      history_len = self.history.len(),
      cursor = self.history.cursor(),
      "committed snapshot"
    );
    Ok(())
  }

  async fn persist(&self, snapshot: Snapshot) -> Result<(), EditorError> {
    let Some(id) = &self.project_id else {
      return Ok(());
    };
    let update = ProjectUpdate::graph(snapshot.nodes, snapshot.edges);
    if self.store.update_project(id, update).await?.is_none() {
      warn!(project_id = %id, "project disappeared from store, changes not saved");
    }
    Ok(())
  }
}

impl std::fmt::Debug for EditorSession {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EditorSession")
      .field("project_id", &self.project_id)
      .field("name", &self.name)
      .field("nodes", &self.graph.nodes().len())
      .field("edges", &self.graph.edges().len())
      .field("history_len", &self.history.len())
      .field("pending", &self.debouncer.deadline())
      .finish()
  }
}
