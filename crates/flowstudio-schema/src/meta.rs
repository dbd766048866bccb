//! The meta-schema: the fixed schema describing the shape of a variable
//! definition itself. The editor compiles this document to drive the
//! create/edit variable form. The form compiler is the same one that
//! drives a node's runtime configuration form, invoked one level up.
//!
//! The locked variant is a derived copy, never a mutation of a shared
//! instance, so two forms compiling concurrently cannot contaminate each
//! other.

use serde_json::{Value, json};

use crate::definition::{VariableDefinition, VariableKind};
use crate::document::VariableSchemaDocument;

/// Field names of the meta-schema form.
pub const TITLE: &str = "title";
pub const VAR_TYPE: &str = "var_type";
pub const REQUIRED: &str = "required";
pub const DEFAULT_VALUE: &str = "default_value";
pub const MIN_LENGTH: &str = "min_length";
pub const MAX_LENGTH: &str = "max_length";
pub const MINIMUM: &str = "minimum";
pub const MAXIMUM: &str = "maximum";
pub const PATTERN: &str = "pattern";

/// Type names accepted by the `var_type` field.
pub const TYPE_NAMES: &[&str] = &["string", "number", "boolean"];

/// The create-mode meta-schema: `title` is freely editable.
pub fn variable_meta_schema() -> VariableSchemaDocument {
  let mut doc = VariableSchemaDocument::new();

  doc.insert_variable(
    TITLE,
    VariableDefinition::new(
      "Title",
      VariableKind::String {
        min_length: Some(1),
        max_length: None,
        pattern: None,
      },
    ),
    true,
  );
  doc.insert_variable(
    VAR_TYPE,
    VariableDefinition::new(
      "Type",
      VariableKind::Enum {
        values: TYPE_NAMES.iter().map(|s| s.to_string()).collect(),
      },
    ),
    true,
  );
  doc.insert_variable(
    REQUIRED,
    VariableDefinition::new("Required", VariableKind::Boolean).with_default(json!(false)),
    false,
  );
  doc.insert_variable(
    DEFAULT_VALUE,
    VariableDefinition::new("Default Value", VariableKind::string()).lenient(),
    false,
  );
  doc.insert_variable(
    MIN_LENGTH,
    VariableDefinition::new(
      "Minimum Length",
      VariableKind::Number {
        minimum: Some(0.0),
        maximum: None,
      },
    ),
    false,
  );
  doc.insert_variable(
    MAX_LENGTH,
    VariableDefinition::new(
      "Maximum Length",
      VariableKind::Number {
        minimum: Some(0.0),
        maximum: None,
      },
    ),
    false,
  );
  doc.insert_variable(
    MINIMUM,
    VariableDefinition::new("Minimum", VariableKind::number()),
    false,
  );
  doc.insert_variable(
    MAXIMUM,
    VariableDefinition::new("Maximum", VariableKind::number()),
    false,
  );
  doc.insert_variable(
    PATTERN,
    VariableDefinition::new("Pattern", VariableKind::string()),
    false,
  );

  doc
}

/// The edit-mode meta-schema: a derived copy with `title` locked to the
/// existing title, so the variable's programmatic identity cannot silently
/// drift while its constraints are being edited.
pub fn variable_meta_schema_locked(title: &str) -> VariableSchemaDocument {
  let mut doc = variable_meta_schema();
  if let Some(def) = doc.properties.get_mut(TITLE) {
    def.default = Some(Value::String(title.to_string()));
    def.const_value = Some(Value::String(title.to_string()));
  }
  doc
}
