use flowboard_config::Node;

/// Hands out sequential node ids.
///
/// Ids only move forward: deleting a node never makes its id available again,
/// and observing a loaded graph can raise the next id but never lower it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
  next: u64,
  overflow: u64,
}

impl IdAllocator {
  pub fn new(next: u64) -> Self {
    Self {
      next: next.max(1),
      overflow: 0,
    }
  }

  /// Start past the highest numeric id among `nodes`.
  pub fn seeded_from(nodes: &[Node]) -> Self {
    let mut ids = Self::new(1);
    ids.observe(nodes);
    ids
  }

  /// Make sure no id in `nodes` can be handed out again.
  pub fn observe(&mut self, nodes: &[Node]) {
    let highest = nodes
      .iter()
      .filter_map(|node| node.id.parse::<u64>().ok())
      .max()
      .unwrap_or(0);
    self.next = self.next.max(highest.saturating_add(1));
  }

  pub fn peek(&self) -> u64 {
    self.next
  }

  /// Next free id. Once the numeric range is used up, ids continue as
  /// `{u64::MAX}-{n}` so allocation never fails.
  pub fn allocate(&mut self) -> String {
    if self.next < u64::MAX {
      let id = self.next;
      self.next += 1;
      return id.to_string();
    }
    self.overflow += 1;
    format!("{}-{}", u64::MAX, self.overflow)
  }
}

impl Default for IdAllocator {
  fn default() -> Self {
    Self::new(1)
  }
}
