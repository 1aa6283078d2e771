use std::time::Duration;

use tokio::time::Instant;

/// A single cancellable deadline that restarts on every touch.
///
/// The debouncer does not run anything itself; its owner checks
/// [`Debouncer::deadline`] and commits when it passes. `cancel` drops the
/// pending deadline, `flush` drops it and reports whether one was pending so
/// the owner can commit right away.
#[derive(Debug, Clone)]
pub struct Debouncer {
  delay: Duration,
  deadline: Option<Instant>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      deadline: None,
    }
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// (Re)start the quiet period from `now`.
  pub fn touch_at(&mut self, now: Instant) -> Instant {
    let deadline = now + self.delay;
    self.deadline = Some(deadline);
    deadline
  }

  pub fn touch(&mut self) -> Instant {
    self.touch_at(Instant::now())
  }

  pub fn deadline(&self) -> Option<Instant> {
    self.deadline
  }

  pub fn is_pending(&self) -> bool {
    self.deadline.is_some()
  }

  pub fn is_due(&self, now: Instant) -> bool {
    self.deadline.is_some_and(|deadline| now >= deadline)
  }

  /// Clear the deadline if it has passed. Returns whether it had.
  pub fn take_due(&mut self, now: Instant) -> bool {
    if self.is_due(now) {
      self.deadline = None;
      true
    } else {
      false
    }
  }

  /// Drop the pending deadline. Returns whether one was pending.
  pub fn cancel(&mut self) -> bool {
    self.deadline.take().is_some()
  }

  /// Drop the pending deadline so the owner can commit now.
  /// Returns whether there was anything to commit.
  pub fn flush(&mut self) -> bool {
    self.cancel()
  }
}
