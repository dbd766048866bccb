use serde::Serialize;
use serde_json::Value;

/// How a compiled field is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
  Text,
  Number,
  Checkbox,
  Select,
}

/// Constraint attributes carried over from the variable definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Constraints {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_length: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_length: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub minimum: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maximum: Option<f64>,
  /// Allowed values for select fields.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<String>,
}

/// A single renderable form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
  /// The variable key this field edits.
  pub name: String,
  /// Human label from the definition's title.
  pub label: String,
  pub input_kind: InputKind,
  pub constraints: Constraints,
  /// Initial value, falling back to the definition's default, then const.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub current_value: Option<Value>,
  pub required: bool,
  /// When set the field is read-only, forced to this value.
  #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
  pub const_value: Option<Value>,
  /// Reject loosely-typed input for this field.
  pub strict: bool,
}
