use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use flowboard_config::{Edge, Node};
use tracing::{debug, info};

use crate::types::{Project, ProjectSummary, ProjectUpdate};
use crate::{Backend, Error};

/// Storage key holding the project list.
pub const DEFAULT_STORAGE_KEY: &str = "workflow_projects";

/// CRUD over the project list kept under one backend key.
///
/// Every call reads the entire list and, for mutations, writes the entire list
/// back. This is fine for the handful of projects a user keeps, and it is not
/// safe with several concurrent writers.
#[derive(Clone)]
pub struct ProjectStore {
  backend: Arc<dyn Backend>,
  key: String,
}

impl ProjectStore {
  /// Create a store over `backend` using the default storage key.
  pub fn new(backend: Arc<dyn Backend>) -> Self {
    Self::with_key(backend, DEFAULT_STORAGE_KEY)
  }

  pub fn with_key(backend: Arc<dyn Backend>, key: impl Into<String>) -> Self {
    Self {
      backend,
      key: key.into(),
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  /// All projects, in creation order.
  pub async fn list_projects(&self) -> Result<Vec<Project>, Error> {
    let Some(raw) = self.backend.get(&self.key).await? else {
      return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|source| Error::Corrupt {
      key: self.key.clone(),
      source,
    })
  }

  pub async fn list_summaries(&self) -> Result<Vec<ProjectSummary>, Error> {
    Ok(
      self
        .list_projects()
        .await?
        .iter()
        .map(Project::summary)
        .collect(),
    )
  }

  pub async fn get_project(&self, id: &str) -> Result<Option<Project>, Error> {
    Ok(
      self
        .list_projects()
        .await?
        .into_iter()
        .find(|project| project.id == id),
    )
  }

  /// Create a project with an empty graph.
  pub async fn create_project(&self, name: &str) -> Result<Project, Error> {
    self.create_project_with(name, Vec::new(), Vec::new()).await
  }

  /// Create a project seeded with a graph (e.g. from a template).
  ///
  /// The id is the creation time in epoch milliseconds, bumped past any id
  /// already taken.
  pub async fn create_project_with(
    &self,
    name: &str,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
  ) -> Result<Project, Error> {
    let mut projects = self.list_projects().await?;
    let now = now_millis();
    let project = Project {
      id: next_id(&projects, now),
      name: name.to_string(),
      nodes,
      edges,
      created_at: now,
      updated_at: now,
    };

    projects.push(project.clone());
    self.write(&projects).await?;

    info!(project_id = %project.id, name = %project.name, "created project");
    Ok(project)
  }

  /// Merge `update` into a project and refresh its `updated_at`.
  ///
  /// Returns `None` without writing when no project has this id.
  pub async fn update_project(
    &self,
    id: &str,
    update: ProjectUpdate,
  ) -> Result<Option<Project>, Error> {
    let mut projects = self.list_projects().await?;
    let Some(project) = projects.iter_mut().find(|project| project.id == id) else {
      debug!(project_id = %id, "update skipped, project not found");
      return Ok(None);
    };

    update.apply_to(project);
    project.updated_at = now_millis();
    let updated = project.clone();

    self.write(&projects).await?;
    debug!(
      project_id = %id,
      nodes = updated.nodes.len(),
      edges = updated.edges.len(),
      "updated project"
    );
    Ok(Some(updated))
  }

  pub async fn rename_project(&self, id: &str, name: &str) -> Result<Option<Project>, Error> {
    self.update_project(id, ProjectUpdate::rename(name)).await
  }

  /// Remove a project. Returns whether it existed.
  pub async fn delete_project(&self, id: &str) -> Result<bool, Error> {
    let mut projects = self.list_projects().await?;
    let before = projects.len();
    projects.retain(|project| project.id != id);
    if projects.len() == before {
      return Ok(false);
    }

    self.write(&projects).await?;
    info!(project_id = %id, "deleted project");
    Ok(true)
  }

  async fn write(&self, projects: &[Project]) -> Result<(), Error> {
    let raw = serde_json::to_string(projects)?;
    self.backend.set(&self.key, raw).await
  }
}

/// Current time at the millisecond precision timestamps are stored with.
fn now_millis() -> DateTime<Utc> {
  Utc::now().trunc_subsecs(3)
}

fn next_id(projects: &[Project], now: DateTime<Utc>) -> String {
  let mut candidate = now.timestamp_millis();
  while projects
    .iter()
    .any(|project| project.id == candidate.to_string())
  {
    candidate += 1;
  }
  candidate.to_string()
}
