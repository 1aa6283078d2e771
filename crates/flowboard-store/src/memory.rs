use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{Backend, Error};

/// In-memory backend.
///
/// Counts writes so callers can observe how often the store was committed to.
#[derive(Debug, Default)]
pub struct MemoryBackend {
  data: Mutex<HashMap<String, String>>,
  writes: AtomicUsize,
}

impl MemoryBackend {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of `set` calls so far.
  pub fn writes(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }

  fn data(&self) -> MutexGuard<'_, HashMap<String, String>> {
    self.data.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[async_trait]
impl Backend for MemoryBackend {
  async fn get(&self, key: &str) -> Result<Option<String>, Error> {
    Ok(self.data().get(key).cloned())
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Error> {
    self.data().insert(key.to_string(), value);
    self.writes.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}
