//! Edge presentation values.
//!
//! These are plain values carried on each edge so that an exported document
//! renders the same way after it is imported elsewhere.

use serde::{Deserialize, Serialize};

pub const DEFAULT_EDGE_COLOR: &str = "#0ea5e9";
pub const TRUE_EDGE_COLOR: &str = "#10b981";
pub const FALSE_EDGE_COLOR: &str = "#ef4444";

const TRUE_LABEL_BG: &str = "#d1fae5";
const FALSE_LABEL_BG: &str = "#fee2e2";

const STROKE_WIDTH: f64 = 2.0;

/// Stroke of the edge path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
  pub stroke: String,
  #[serde(default = "default_stroke_width")]
  pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
  STROKE_WIDTH
}

impl EdgeStyle {
  pub fn colored(color: &str) -> Self {
    Self {
      stroke: color.to_string(),
      stroke_width: STROKE_WIDTH,
    }
  }
}

impl Default for EdgeStyle {
  fn default() -> Self {
    Self::colored(DEFAULT_EDGE_COLOR)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
  #[default]
  ArrowClosed,
  Arrow,
}

/// Arrow head drawn at the target end of an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
  #[serde(rename = "type", default)]
  pub kind: MarkerKind,
  pub color: String,
}

impl Marker {
  pub fn arrow_closed(color: &str) -> Self {
    Self {
      kind: MarkerKind::ArrowClosed,
      color: color.to_string(),
    }
  }
}

impl Default for Marker {
  fn default() -> Self {
    Self::arrow_closed(DEFAULT_EDGE_COLOR)
  }
}

/// Text style of a branch label.
///
/// Plain edges carry an empty style object, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelStyle {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fill: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font_weight: Option<u16>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font_size: Option<u16>,
}

impl LabelStyle {
  pub fn branch(color: &str) -> Self {
    Self {
      fill: Some(color.to_string()),
      font_weight: Some(600),
      font_size: Some(12),
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// Background box behind a branch label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelBgStyle {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fill: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fill_opacity: Option<f64>,
}

impl LabelBgStyle {
  pub fn for_true_branch() -> Self {
    Self {
      fill: Some(TRUE_LABEL_BG.to_string()),
      fill_opacity: Some(0.9),
    }
  }

  pub fn for_false_branch() -> Self {
    Self {
      fill: Some(FALSE_LABEL_BG.to_string()),
      fill_opacity: Some(0.9),
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_label_styles_parse() {
    let style: LabelStyle = serde_json::from_str("{}").unwrap();
    let bg: LabelBgStyle = serde_json::from_str("{}").unwrap();

    assert!(style.is_empty());
    assert!(bg.is_empty());
    assert_eq!(serde_json::to_string(&style).unwrap(), "{}");
  }

  #[test]
  fn test_branch_label_style_shape() {
    let value = serde_json::to_value(LabelStyle::branch(TRUE_EDGE_COLOR)).unwrap();
    assert_eq!(
      value,
      serde_json::json!({"fill": "#10b981", "fontWeight": 600, "fontSize": 12})
    );
  }
}
