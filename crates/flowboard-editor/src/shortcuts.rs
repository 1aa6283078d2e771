use serde::Deserialize;

/// A key press as reported by the host window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyEvent {
  pub key: String,
  pub ctrl: bool,
  pub meta: bool,
  pub shift: bool,
}

impl KeyEvent {
  /// A key pressed with Ctrl held.
  pub fn ctrl(key: &str) -> Self {
    Self {
      key: key.to_string(),
      ctrl: true,
      ..Default::default()
    }
  }

  /// A key pressed with Ctrl and Shift held.
  pub fn ctrl_shift(key: &str) -> Self {
    Self {
      shift: true,
      ..Self::ctrl(key)
    }
  }
}

/// Editor action bound to a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
  Undo,
  Redo,
  Duplicate,
}

impl ShortcutAction {
  /// Ctrl/Cmd+Z undoes, Ctrl/Cmd+Shift+Z or Ctrl/Cmd+Y redoes, Ctrl/Cmd+D duplicates.
  pub fn resolve(event: &KeyEvent) -> Option<Self> {
    if !(event.ctrl || event.meta) {
      return None;
    }
    // Shift turns "z" into "Z" on most platforms.
    match event.key.to_ascii_lowercase().as_str() {
      "z" if event.shift => Some(ShortcutAction::Redo),
      "z" => Some(ShortcutAction::Undo),
      "y" => Some(ShortcutAction::Redo),
      "d" => Some(ShortcutAction::Duplicate),
      _ => None,
    }
  }
}
