use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{Backend, Error};

/// Filesystem backend.
///
/// Each key is stored as `{base_path}/{key}.json`. The directory is created on
/// first write.
pub struct FsBackend {
  base_path: PathBuf,
}

impl FsBackend {
  /// Create a new filesystem backend rooted at `base_path`.
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  pub fn base_path(&self) -> &Path {
    &self.base_path
  }

  fn key_to_path(&self, key: &str) -> PathBuf {
    self.base_path.join(format!("{}.json", key))
  }
}

#[async_trait]
impl Backend for FsBackend {
  async fn get(&self, key: &str) -> Result<Option<String>, Error> {
    match fs::read_to_string(self.key_to_path(key)).await {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(Error::Io(e)),
    }
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Error> {
    fs::create_dir_all(&self.base_path).await?;

    // Write next to the target and rename so a crash never leaves half a list.
    let path = self.key_to_path(key);
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, value).await?;
    fs::rename(&staging, &path).await?;
    Ok(())
  }
}
