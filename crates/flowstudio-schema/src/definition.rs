use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single configurable variable attached to a node.
///
/// The variable's programmatic key lives in the owning document's property
/// map, not here. Keys are immutable once a variable exists, while the
/// title, type, and constraints remain editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
  /// Human label shown in the editor.
  pub title: String,
  #[serde(flatten)]
  pub kind: VariableKind,
  /// Seed value used when rendering a fresh form for this variable.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default: Option<Value>,
  /// When present the field is presented read-only, forced to this value.
  #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
  pub const_value: Option<Value>,
  /// Reject loosely-typed input for this field even when the document
  /// itself is permissive. Absent means strict.
  #[serde(default = "default_strict")]
  pub strict: bool,
}

fn default_strict() -> bool {
  true
}

impl VariableDefinition {
  pub fn new(title: impl Into<String>, kind: VariableKind) -> Self {
    Self {
      title: title.into(),
      kind,
      default: None,
      const_value: None,
      strict: true,
    }
  }

  /// Lock the field to `value`: both `default` and `const` are set, so the
  /// compiled form presents it pre-filled and read-only.
  pub fn locked(mut self, value: Value) -> Self {
    self.default = Some(value.clone());
    self.const_value = Some(value);
    self
  }

  pub fn with_default(mut self, value: Value) -> Self {
    self.default = Some(value);
    self
  }

  /// Accept loosely-typed input (string forms of numbers and booleans).
  pub fn lenient(mut self) -> Self {
    self.strict = false;
    self
  }
}

/// Closed type vocabulary for variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariableKind {
  String {
    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
  },
  Number {
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,
  },
  Boolean,
  Enum {
    values: Vec<String>,
  },
}

impl VariableKind {
  /// An unconstrained string.
  pub fn string() -> Self {
    VariableKind::String {
      min_length: None,
      max_length: None,
      pattern: None,
    }
  }

  /// An unbounded number.
  pub fn number() -> Self {
    VariableKind::Number {
      minimum: None,
      maximum: None,
    }
  }

  /// The wire name of this kind, matching the serde tag.
  pub fn type_name(&self) -> &'static str {
    match self {
      VariableKind::String { .. } => "string",
      VariableKind::Number { .. } => "number",
      VariableKind::Boolean => "boolean",
      VariableKind::Enum { .. } => "enum",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_strict_defaults_to_true_when_absent() {
    let def: VariableDefinition =
      serde_json::from_value(json!({ "title": "Region", "type": "string" })).unwrap();
    assert!(def.strict);
  }

  #[test]
  fn test_strict_can_be_disabled_explicitly() {
    let def: VariableDefinition = serde_json::from_value(json!({
      "title": "Count",
      "type": "number",
      "strict": false
    }))
    .unwrap();
    assert!(!def.strict);
  }

  #[test]
  fn test_kind_tag_carries_constraints() {
    let def: VariableDefinition = serde_json::from_value(json!({
      "title": "Name",
      "type": "string",
      "max_length": 10
    }))
    .unwrap();
    match def.kind {
      VariableKind::String { max_length, .. } => assert_eq!(max_length, Some(10)),
      _ => panic!("expected string kind"),
    }
  }

  #[test]
  fn test_locked_sets_default_and_const() {
    let def = VariableDefinition::new("Title", VariableKind::string()).locked(json!("Foo"));
    assert_eq!(def.default, Some(json!("Foo")));
    assert_eq!(def.const_value, Some(json!("Foo")));
  }
}
