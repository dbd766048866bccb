//! Schema-to-form compilation.

use serde_json::{Map, Value};

use flowstudio_schema::{VariableKind, VariableSchemaDocument};

use crate::field::{Constraints, FieldDescriptor, InputKind};
use crate::validate::{ValidationReport, check_field};

/// The compiled form: an ordered field list plus a validation function.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledForm {
  fields: Vec<FieldDescriptor>,
}

impl CompiledForm {
  /// The fields in document property order.
  pub fn fields(&self) -> &[FieldDescriptor] {
    &self.fields
  }

  pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
    self.fields.iter().find(|f| f.name == name)
  }

  /// Validate a value bag against the compiled fields.
  ///
  /// Pure: the same values always yield the same report. Keys with no
  /// corresponding field are reported as errors; stray input never passes
  /// silently.
  pub fn validate(&self, values: &Map<String, Value>) -> ValidationReport {
    let mut report = ValidationReport::new();

    for field in &self.fields {
      if let Some(message) = check_field(field, values.get(field.name.as_str())) {
        report.add(field.name.clone(), message);
      }
    }

    for key in values.keys() {
      if self.field(key).is_none() {
        report.add(key.clone(), "unknown field".to_string());
      }
    }

    report
  }
}

/// Compile a schema document and an initial value bag into a form.
///
/// Pure and deterministic: no side effects, field order follows the
/// document's property order.
pub fn compile(document: &VariableSchemaDocument, initial_values: &Map<String, Value>) -> CompiledForm {
  let fields = document
    .properties
    .iter()
    .map(|(key, definition)| {
      let (input_kind, constraints) = match &definition.kind {
        VariableKind::String {
          min_length,
          max_length,
          pattern,
        } => (
          InputKind::Text,
          Constraints {
            min_length: *min_length,
            max_length: *max_length,
            pattern: pattern.clone(),
            ..Constraints::default()
          },
        ),
        VariableKind::Number { minimum, maximum } => (
          InputKind::Number,
          Constraints {
            minimum: *minimum,
            maximum: *maximum,
            ..Constraints::default()
          },
        ),
        VariableKind::Boolean => (InputKind::Checkbox, Constraints::default()),
        VariableKind::Enum { values } => (
          InputKind::Select,
          Constraints {
            options: values.clone(),
            ..Constraints::default()
          },
        ),
      };

      let current_value = initial_values
        .get(key.as_str())
        .cloned()
        .or_else(|| definition.default.clone())
        .or_else(|| definition.const_value.clone());

      FieldDescriptor {
        name: key.clone(),
        label: definition.title.clone(),
        input_kind,
        constraints,
        current_value,
        required: document.is_required(key),
        const_value: definition.const_value.clone(),
        strict: definition.strict,
      }
    })
    .collect();

  CompiledForm { fields }
}
