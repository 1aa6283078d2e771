use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use flowboard_config::{Connection, NodeDataPatch, NodeKind, Position};
use flowboard_editor::{
  EditorCommand, EditorConfig, EditorError, EditorRunner, EditorSession, KeyEvent,
};
use flowboard_store::{Backend, MemoryBackend, ProjectStore};
use flowboard_workflow::{NodeChange, WorkflowGraph, default_edges, default_nodes};
use tokio_util::sync::CancellationToken;

async fn sample_project() -> (Arc<MemoryBackend>, ProjectStore, String) {
  let backend = Arc::new(MemoryBackend::new());
  let store = ProjectStore::new(backend.clone());
  let project = store
    .create_project_with("Lead Routing", default_nodes(), default_edges())
    .await
    .unwrap();
  (backend, store, project.id)
}

fn drag(id: &str, x: f64, dragging: bool) -> EditorCommand {
  EditorCommand::NodesChanged {
    changes: vec![NodeChange::Position {
      id: id.to_string(),
      position: Some(Position::new(x, 100.0)),
      dragging,
    }],
  }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_drag_commits_once() {
  let (backend, store, id) = sample_project().await;
  let session = EditorSession::open(store.clone(), Some(&id), EditorConfig::default())
    .await
    .unwrap();
  let baseline = backend.writes();

  let runner = EditorRunner::new(session);
  let sender = runner.sender();
  let handle = tokio::spawn(runner.start(CancellationToken::new()));

  for step in 0..10 {
    sender
      .send(drag("2", 100.0 + step as f64 * 10.0, step < 9))
      .await
      .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
  }
  assert_eq!(backend.writes(), baseline);

  tokio::time::sleep(Duration::from_millis(400)).await;
  assert_eq!(backend.writes(), baseline + 1);

  drop(sender);
  let session = handle.await.unwrap().unwrap();
  assert_eq!(session.history().len(), 2);
  assert_eq!(backend.writes(), baseline + 1);

  let stored = store.get_project(&id).await.unwrap().unwrap();
  let moved = stored.nodes.iter().find(|node| node.id == "2").unwrap();
  assert_eq!(moved.position, Position::new(190.0, 100.0));
  assert!(!moved.dragging);
}

#[tokio::test(start_paused = true)]
async fn test_quiet_gap_splits_commits() {
  let (backend, store, id) = sample_project().await;
  let session = EditorSession::open(store, Some(&id), EditorConfig::default())
    .await
    .unwrap();
  let baseline = backend.writes();

  let runner = EditorRunner::new(session);
  let sender = runner.sender();
  let handle = tokio::spawn(runner.start(CancellationToken::new()));

  sender.send(drag("2", 120.0, false)).await.unwrap();
  tokio::time::sleep(Duration::from_millis(350)).await;
  sender.send(drag("2", 140.0, false)).await.unwrap();
  tokio::time::sleep(Duration::from_millis(350)).await;

  drop(sender);
  let session = handle.await.unwrap().unwrap();
  assert_eq!(backend.writes(), baseline + 2);
  assert_eq!(session.history().len(), 3);
}

#[tokio::test]
async fn test_import_replaces_graph() {
  let (_backend, store, id) = sample_project().await;
  let mut session = EditorSession::open(store.clone(), Some(&id), EditorConfig::default())
    .await
    .unwrap();

  let input = r#"{"nodes":[{"id":"1","type":"start","position":{"x":0,"y":0},"data":{"label":"A","description":"","trigger":"webhook"}}],"edges":[]}"#;
  session.import_json(input).await.unwrap();

  let nodes = session.graph().nodes();
  assert_eq!(nodes.len(), 1);
  assert_eq!(nodes[0].kind(), NodeKind::Start);
  assert_eq!(nodes[0].data.label(), "A");
  assert!(session.graph().edges().is_empty());

  let stored = store.get_project(&id).await.unwrap().unwrap();
  assert_eq!(stored.nodes.len(), 1);
  assert!(stored.edges.is_empty());
  assert!(session.can_undo());
}

#[tokio::test]
async fn test_invalid_import_is_reported_and_ignored() {
  let (backend, store, id) = sample_project().await;
  let mut session = EditorSession::open(store, Some(&id), EditorConfig::default())
    .await
    .unwrap();
  let before = session.graph().snapshot();
  let writes = backend.writes();

  let err = session.import_json("{\"nodes\": [").await.unwrap_err();

  assert!(matches!(err, EditorError::InvalidImport { .. }));
  assert_eq!(err.to_string(), "Invalid workflow file");
  assert_eq!(session.graph().snapshot(), before);
  assert_eq!(backend.writes(), writes);
}

#[tokio::test]
async fn test_export_import_round_trip() {
  let dir = tempfile::tempdir().unwrap();
  let (_backend, store, id) = sample_project().await;
  let source = EditorSession::open(store.clone(), Some(&id), EditorConfig::default())
    .await
    .unwrap();

  let path = source.export_to(dir.path()).await.unwrap();

  let blank = store.create_project("Blank").await.unwrap();
  let mut target = EditorSession::open(store, Some(&blank.id), EditorConfig::default())
    .await
    .unwrap();
  assert!(target.graph().nodes().is_empty());

  target.import_file(&path).await.unwrap();

  assert_eq!(target.graph().snapshot(), WorkflowGraph::sample().snapshot());
  assert_eq!(target.graph().snapshot(), source.graph().snapshot());
}

#[tokio::test]
async fn test_label_edit_reaches_store_after_flush() {
  let (_backend, store, id) = sample_project().await;
  let mut session = EditorSession::open(store.clone(), Some(&id), EditorConfig::default())
    .await
    .unwrap();

  let patch = NodeDataPatch {
    true_label: Some("VIP".to_string()),
    ..Default::default()
  };
  assert!(session.update_node_data("3", &patch));
  assert!(session.has_pending());

  let edge = session
    .display_edges()
    .into_iter()
    .find(|edge| edge.id == "e3-4")
    .unwrap();
  assert_eq!(edge.label.as_deref(), Some("VIP"));

  session.flush().await.unwrap();
  let stored = store.get_project(&id).await.unwrap().unwrap();
  let edge = stored.edges.iter().find(|edge| edge.id == "e3-4").unwrap();
  assert_eq!(edge.label.as_deref(), Some("VIP"));
}

#[tokio::test]
async fn test_switch_flushes_to_previous_project() {
  let (_backend, store, first) = sample_project().await;
  let second = store.create_project("Second").await.unwrap();
  let mut session = EditorSession::open(store.clone(), Some(&first), EditorConfig::default())
    .await
    .unwrap();

  session.add_node(NodeKind::Action, Position::new(0.0, 0.0));
  session.switch_project(Some(&second.id)).await.unwrap();

  assert_eq!(session.project_id(), Some(second.id.as_str()));
  assert_eq!(session.name(), "Second");
  assert!(session.graph().nodes().is_empty());
  assert_eq!(session.history().len(), 1);
  assert!(!session.can_undo());

  let first = store.get_project(&first).await.unwrap().unwrap();
  assert_eq!(first.nodes.len(), 8);
  let second = store.get_project(&second.id).await.unwrap().unwrap();
  assert!(second.nodes.is_empty());
}

#[tokio::test]
async fn test_undo_redo_persist_restored_graph() {
  let (backend, store, id) = sample_project().await;
  let mut session = EditorSession::open(store.clone(), Some(&id), EditorConfig::default())
    .await
    .unwrap();

  let added = session.add_node(NodeKind::Terminal, Position::new(900.0, 100.0));
  session
    .connect(&Connection::new("5", added.id.as_str()))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(session.history().len(), 2);

  let writes = backend.writes();
  assert!(session.handle_key(&KeyEvent::ctrl("z")).await.unwrap().is_some());
  assert_eq!(backend.writes(), writes + 1);
  assert_eq!(session.history().len(), 2);
  let stored = store.get_project(&id).await.unwrap().unwrap();
  assert_eq!(stored.nodes.len(), 7);
  assert_eq!(stored.edges.len(), 6);

  assert!(session.handle_key(&KeyEvent::ctrl_shift("Z")).await.unwrap().is_some());
  let stored = store.get_project(&id).await.unwrap().unwrap();
  assert_eq!(stored.nodes.len(), 8);
  assert_eq!(stored.edges.len(), 7);

  // A fresh edit after undo discards the redo branch.
  session.undo().await.unwrap();
  session.add_node(NodeKind::Action, Position::new(0.0, 0.0));
  session.flush().await.unwrap();
  assert!(!session.can_redo());
  assert!(!session.redo().await.unwrap());
}

#[tokio::test]
async fn test_new_node_ids_do_not_collide_after_reload() {
  let (_backend, store, id) = sample_project().await;
  let mut session = EditorSession::open(store.clone(), Some(&id), EditorConfig::default())
    .await
    .unwrap();
  let first = session.add_node(NodeKind::Action, Position::new(0.0, 0.0));
  session.close().await.unwrap();

  let mut reopened = EditorSession::open(store, Some(&id), EditorConfig::default())
    .await
    .unwrap();
  let second = reopened.add_node(NodeKind::Action, Position::new(0.0, 0.0));

  assert_ne!(first.id, second.id);
  assert_eq!(
    reopened
      .graph()
      .nodes()
      .iter()
      .filter(|node| node.id == second.id)
      .count(),
    1
  );
}

/// Memory backend whose writes fail while `failing` is set.
struct FlakyBackend {
  inner: MemoryBackend,
  failing: AtomicBool,
}

#[async_trait]
impl Backend for FlakyBackend {
  async fn get(&self, key: &str) -> Result<Option<String>, flowboard_store::Error> {
    self.inner.get(key).await
  }

  async fn set(&self, key: &str, value: String) -> Result<(), flowboard_store::Error> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(flowboard_store::Error::Io(std::io::Error::other("disk full")));
    }
    self.inner.set(key, value).await
  }
}

#[tokio::test]
async fn test_failed_write_stays_pending_and_retries() {
  let backend = Arc::new(FlakyBackend {
    inner: MemoryBackend::new(),
    failing: AtomicBool::new(false),
  });
  let store = ProjectStore::new(backend.clone());
  let project = store
    .create_project_with("Lead Routing", default_nodes(), default_edges())
    .await
    .unwrap();
  let mut session = EditorSession::open(store.clone(), Some(&project.id), EditorConfig::default())
    .await
    .unwrap();

  session.add_node(NodeKind::Action, Position::new(0.0, 0.0));
  backend.failing.store(true, Ordering::SeqCst);

  assert!(session.flush().await.is_err());
  assert_eq!(session.history().len(), 1);
  assert!(session.has_pending());
  let stored = store.get_project(&project.id).await.unwrap().unwrap();
  assert_eq!(stored.nodes.len(), 7);

  backend.failing.store(false, Ordering::SeqCst);
  assert!(session.flush().await.unwrap());
  assert_eq!(session.history().len(), 2);
  assert!(!session.has_pending());
  let stored = store.get_project(&project.id).await.unwrap().unwrap();
  assert_eq!(stored.nodes.len(), 8);
}

#[tokio::test]
async fn test_import_accepts_plain_edge_with_empty_styles() {
  let (_backend, store, id) = sample_project().await;
  let mut session = EditorSession::open(store.clone(), Some(&id), EditorConfig::default())
    .await
    .unwrap();

  let input = r#"{
    "nodes": [
      {"id":"1","type":"start","position":{"x":0,"y":0},"data":{"label":"A","description":"","trigger":"webhook"}},
      {"id":"2","type":"terminal","position":{"x":0,"y":100},"data":{"label":"B","description":""}}
    ],
    "edges": [
      {"id":"reactflow__edge-1-2","source":"1","target":"2","sourceHandle":null,"targetHandle":null,
       "label":"","labelStyle":{},"labelBgStyle":{}}
    ]
  }"#;
  session.import_json(input).await.unwrap();

  assert_eq!(session.graph().edges().len(), 1);
  let stored = store.get_project(&id).await.unwrap().unwrap();
  assert_eq!(stored.edges[0].id, "reactflow__edge-1-2");
}
