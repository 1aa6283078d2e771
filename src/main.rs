use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use flowboard_editor::{EditorCommand, EditorConfig, EditorRunner, EditorSession};
use flowboard_store::{Backend, FsBackend, ProjectStore, SqliteBackend};
use flowboard_workflow::{find_template, templates};

/// Flowboard - a visual workflow builder's editing core
#[derive(Parser)]
#[command(name = "flowboard")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.flowboard)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Storage backend for the project list
  #[arg(long, global = true, value_enum, default_value_t = BackendKind::Fs)]
  backend: BackendKind,

  /// Editor config file (JSON)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendKind {
  /// One JSON file per key under the data directory
  Fs,
  /// SQLite database in the data directory
  Sqlite,
}

#[derive(Subcommand)]
enum Commands {
  /// Manage stored projects
  Projects {
    #[command(subcommand)]
    action: ProjectsCommand,
  },

  /// List the templates new projects can start from
  Templates,

  /// Print a project's nodes and edges
  Show {
    project_id: String,
  },

  /// Export a project to <out>/workflow.json
  Export {
    project_id: String,

    /// Directory to write into
    #[arg(long, default_value = ".")]
    out: PathBuf,
  },

  /// Replace a project's graph with a workflow file
  Import {
    project_id: String,
    file: PathBuf,
  },

  /// Apply a JSON array of editor commands to a project
  Replay {
    project_id: String,

    /// Script file (reads stdin when omitted)
    script: Option<PathBuf>,
  },
}

#[derive(Subcommand)]
enum ProjectsCommand {
  /// List projects
  List,

  /// Create a project
  Create {
    name: String,

    /// Start from a template instead of an empty canvas
    #[arg(long)]
    template: Option<String>,
  },

  /// Rename a project
  Rename { project_id: String, name: String },

  /// Delete a project
  Delete { project_id: String },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".flowboard"),
  };

  let Some(command) = cli.command else {
    println!("flowboard - use --help to see available commands");
    return Ok(());
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(command, data_dir, cli.backend, cli.config).await })
}

async fn run(
  command: Commands,
  data_dir: PathBuf,
  backend: BackendKind,
  config_file: Option<PathBuf>,
) -> Result<()> {
  let config = match &config_file {
    Some(path) => EditorConfig::load(path)
      .await
      .with_context(|| format!("failed to load config: {}", path.display()))?,
    None => EditorConfig::default(),
  };
  let store = open_store(&data_dir, backend, &config).await?;

  match command {
    Commands::Projects { action } => run_projects(&store, action).await,
    Commands::Templates => {
      for template in templates() {
        println!(
          "{}\t{} ({} nodes, {} edges)\t{}",
          template.id,
          template.name,
          template.nodes.len(),
          template.edges.len(),
          template.description
        );
      }
      Ok(())
    }
    Commands::Show { project_id } => {
      let session = open_session(store, &project_id, config).await?;
      println!("{} ({})", session.name(), project_id);
      for node in session.graph().nodes() {
        println!(
          "  node {}\t{}\t{:?}\t({}, {})",
          node.id,
          node.kind(),
          node.data.label(),
          node.position.x,
          node.position.y
        );
      }
      for edge in session.display_edges() {
        let label = edge.label.as_deref().unwrap_or("");
        println!("  edge {}\t{} -> {}\t{}", edge.id, edge.source, edge.target, label);
      }
      Ok(())
    }
    Commands::Export { project_id, out } => {
      let session = open_session(store, &project_id, config).await?;
      let path = session
        .export_to(&out)
        .await
        .with_context(|| format!("failed to export to {}", out.display()))?;
      eprintln!("Exported {} to {}", session.name(), path.display());
      Ok(())
    }
    Commands::Import { project_id, file } => {
      let mut session = open_session(store, &project_id, config).await?;
      session
        .import_file(&file)
        .await
        .with_context(|| format!("failed to import {}", file.display()))?;
      eprintln!(
        "Imported {} nodes and {} edges into {}",
        session.graph().nodes().len(),
        session.graph().edges().len(),
        session.name()
      );
      Ok(())
    }
    Commands::Replay { project_id, script } => {
      let commands = read_script(script.as_deref()).await?;
      let session = open_session(store, &project_id, config).await?;
      replay(session, commands).await
    }
  }
}

async fn open_store(data_dir: &Path, backend: BackendKind, config: &EditorConfig) -> Result<ProjectStore> {
  let backend: Arc<dyn Backend> = match backend {
    BackendKind::Fs => Arc::new(FsBackend::new(data_dir.join("projects"))),
    BackendKind::Sqlite => {
      tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create data dir: {}", data_dir.display()))?;
      let path = data_dir.join("flowboard.db");
      Arc::new(
        SqliteBackend::open(&path)
          .await
          .with_context(|| format!("failed to open database: {}", path.display()))?,
      )
    }
  };
  debug!(data_dir = %data_dir.display(), key = %config.storage_key, "opened project store");
  Ok(ProjectStore::with_key(backend, config.storage_key.clone()))
}

/// Open a stored project. Unknown ids are an error here rather than falling
/// back to the sample graph, since nothing could be saved.
async fn open_session(
  store: ProjectStore,
  project_id: &str,
  config: EditorConfig,
) -> Result<EditorSession> {
  let session = EditorSession::open(store, Some(project_id), config).await?;
  if session.project_id().is_none() {
    anyhow::bail!("project '{}' not found", project_id);
  }
  Ok(session)
}

async fn run_projects(store: &ProjectStore, action: ProjectsCommand) -> Result<()> {
  match action {
    ProjectsCommand::List => {
      for summary in store.list_summaries().await? {
        println!(
          "{}\t{}\t{} nodes, {} edges\tupdated {}",
          summary.id,
          summary.name,
          summary.node_count,
          summary.edge_count,
          summary.updated_at.to_rfc3339()
        );
      }
    }
    ProjectsCommand::Create { name, template } => {
      let project = match template {
        Some(template_id) => {
          let template = find_template(&template_id)
            .with_context(|| format!("template '{}' not found", template_id))?;
          store
            .create_project_with(&name, template.nodes, template.edges)
            .await?
        }
        None => store.create_project(&name).await?,
      };
      println!("{}", project.id);
    }
    ProjectsCommand::Rename { project_id, name } => {
      store
        .rename_project(&project_id, &name)
        .await?
        .with_context(|| format!("project '{}' not found", project_id))?;
    }
    ProjectsCommand::Delete { project_id } => {
      if !store.delete_project(&project_id).await? {
        anyhow::bail!("project '{}' not found", project_id);
      }
    }
  }
  Ok(())
}

async fn replay(session: EditorSession, commands: Vec<EditorCommand>) -> Result<()> {
  let runner = EditorRunner::new(session);
  let sender = runner.sender();
  let cancel = CancellationToken::new();
  let handle = tokio::spawn(runner.start(cancel.clone()));

  let count = commands.len();
  for command in commands {
    sender.send(command).await.context("editor runner stopped early")?;
  }
  // Closing the channel lets the runner flush and exit.
  drop(sender);

  let session = handle.await.context("editor runner panicked")??;
  eprintln!(
    "Replayed {} commands: {} nodes, {} edges, {} history entries",
    count,
    session.graph().nodes().len(),
    session.graph().edges().len(),
    session.history().len()
  );
  Ok(())
}

async fn read_script(path: Option<&Path>) -> Result<Vec<EditorCommand>> {
  let content = match path {
    Some(path) => tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("failed to read script: {}", path.display()))?,
    None => read_stdin()?,
  };
  serde_json::from_str(&content).context("failed to parse editor commands")
}

fn read_stdin() -> Result<String> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // No stdin pipe, nothing to replay
    return Ok("[]".to_string());
  }
  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read commands from stdin")?;
  if input.trim().is_empty() {
    Ok("[]".to_string())
  } else {
    Ok(input)
  }
}
