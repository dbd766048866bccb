//! Translation between meta-form value bags and variable definitions.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use flowstudio_schema::{VariableDefinition, VariableKind, meta};
use flowstudio_session::SelectedVariable;

use crate::error::EditorError;

/// Build a definition (plus its required flag) from an already-validated
/// meta-form value bag.
pub(crate) fn definition_from_values(
  values: &Map<String, Value>,
) -> Result<(VariableDefinition, bool), EditorError> {
  let title = values
    .get(meta::TITLE)
    .and_then(Value::as_str)
    .ok_or_else(|| invalid(meta::TITLE, "value is required"))?;
  let var_type = values
    .get(meta::VAR_TYPE)
    .and_then(Value::as_str)
    .ok_or_else(|| invalid(meta::VAR_TYPE, "value is required"))?;

  let kind = match var_type {
    "string" => VariableKind::String {
      min_length: get_u64(values, meta::MIN_LENGTH),
      max_length: get_u64(values, meta::MAX_LENGTH),
      pattern: get_text(values, meta::PATTERN),
    },
    "number" => VariableKind::Number {
      minimum: get_f64(values, meta::MINIMUM),
      maximum: get_f64(values, meta::MAXIMUM),
    },
    "boolean" => VariableKind::Boolean,
    other => {
      return Err(invalid(
        meta::VAR_TYPE,
        format!("unsupported type '{}'", other),
      ));
    }
  };

  let mut definition = VariableDefinition::new(title, kind);
  if let Some(default) = values.get(meta::DEFAULT_VALUE)
    && !is_blank(default)
  {
    definition.default = Some(default.clone());
  }

  let required = values
    .get(meta::REQUIRED)
    .and_then(Value::as_bool)
    .unwrap_or(false);

  Ok((definition, required))
}

/// Initial values for the edit-mode meta form, mirroring the selected
/// definition's current state.
pub(crate) fn meta_initial_values(
  selected: &SelectedVariable,
  required: bool,
) -> Map<String, Value> {
  let mut values = Map::new();
  values.insert(
    meta::TITLE.to_string(),
    Value::String(selected.definition.title.clone()),
  );
  values.insert(
    meta::VAR_TYPE.to_string(),
    Value::String(selected.definition.kind.type_name().to_string()),
  );
  values.insert(meta::REQUIRED.to_string(), Value::Bool(required));
  if let Some(default) = &selected.definition.default {
    values.insert(meta::DEFAULT_VALUE.to_string(), default.clone());
  }

  match &selected.definition.kind {
    VariableKind::String {
      min_length,
      max_length,
      pattern,
    } => {
      if let Some(min) = min_length {
        values.insert(meta::MIN_LENGTH.to_string(), Value::from(*min));
      }
      if let Some(max) = max_length {
        values.insert(meta::MAX_LENGTH.to_string(), Value::from(*max));
      }
      if let Some(pattern) = pattern {
        values.insert(meta::PATTERN.to_string(), Value::String(pattern.clone()));
      }
    }
    VariableKind::Number { minimum, maximum } => {
      if let Some(min) = minimum {
        values.insert(meta::MINIMUM.to_string(), Value::from(*min));
      }
      if let Some(max) = maximum {
        values.insert(meta::MAXIMUM.to_string(), Value::from(*max));
      }
    }
    VariableKind::Boolean | VariableKind::Enum { .. } => {}
  }

  values
}

fn invalid(field: &str, message: impl Into<String>) -> EditorError {
  EditorError::ValidationFailed {
    errors: BTreeMap::from([(field.to_string(), message.into())]),
  }
}

fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

fn get_text(values: &Map<String, Value>, key: &str) -> Option<String> {
  values
    .get(key)
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

fn get_f64(values: &Map<String, Value>, key: &str) -> Option<f64> {
  values.get(key).and_then(Value::as_f64)
}

fn get_u64(values: &Map<String, Value>, key: &str) -> Option<u64> {
  values.get(key).and_then(Value::as_f64).map(|f| f as u64)
}
