//! Field-level validation.
//!
//! Strict fields reject values of the wrong JSON type outright. Lenient
//! fields additionally accept string input coercible to the target type,
//! matching how runtime inputs are coerced after template resolution.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::field::{FieldDescriptor, InputKind};

/// Outcome of validating a value bag. Field-level and recoverable; a failed
/// report only blocks submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
  pub valid: bool,
  pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
  pub(crate) fn new() -> Self {
    Self {
      valid: true,
      errors: BTreeMap::new(),
    }
  }

  pub(crate) fn add(&mut self, field: String, message: String) {
    self.valid = false;
    self.errors.insert(field, message);
  }
}

/// Check one field against its submitted value. None means the field passes.
pub(crate) fn check_field(field: &FieldDescriptor, value: Option<&Value>) -> Option<String> {
  let value = match value {
    Some(Value::Null) | None => {
      return field.required.then(|| "value is required".to_string());
    }
    Some(Value::String(s)) if s.is_empty() => {
      return field.required.then(|| "value is required".to_string());
    }
    Some(v) => v,
  };

  if let Some(forced) = &field.const_value
    && value != forced
  {
    return Some(format!("value is locked to {}", forced));
  }

  match field.input_kind {
    InputKind::Text => check_text(field, value),
    InputKind::Number => check_number(field, value),
    InputKind::Checkbox => check_boolean(field, value),
    InputKind::Select => check_select(field, value),
  }
}

fn check_text(field: &FieldDescriptor, value: &Value) -> Option<String> {
  let text = match value {
    Value::String(s) => s.clone(),
    Value::Number(n) if !field.strict => n.to_string(),
    Value::Bool(b) if !field.strict => b.to_string(),
    _ => return Some("expected a string".to_string()),
  };

  let length = text.chars().count() as u64;
  if let Some(min) = field.constraints.min_length
    && length < min
  {
    return Some(format!("must be at least {} characters", min));
  }
  if let Some(max) = field.constraints.max_length
    && length > max
  {
    return Some(format!("must be at most {} characters", max));
  }
  if let Some(pattern) = &field.constraints.pattern {
    match Regex::new(pattern) {
      Ok(re) => {
        if !re.is_match(&text) {
          return Some(format!("must match pattern {}", pattern));
        }
      }
      Err(_) => return Some(format!("invalid pattern {}", pattern)),
    }
  }

  None
}

fn check_number(field: &FieldDescriptor, value: &Value) -> Option<String> {
  let number = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) if !field.strict => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  let Some(number) = number else {
    return Some(format!("expected a number, got {}", value));
  };

  if let Some(min) = field.constraints.minimum
    && number < min
  {
    return Some(format!("must be at least {}", min));
  }
  if let Some(max) = field.constraints.maximum
    && number > max
  {
    return Some(format!("must be at most {}", max));
  }

  None
}

fn check_boolean(field: &FieldDescriptor, value: &Value) -> Option<String> {
  match value {
    Value::Bool(_) => None,
    Value::String(s) if !field.strict => match s.to_lowercase().as_str() {
      "true" | "false" => None,
      _ => Some(format!("expected a boolean, got '{}'", s)),
    },
    _ => Some(format!("expected a boolean, got {}", value)),
  }
}

fn check_select(field: &FieldDescriptor, value: &Value) -> Option<String> {
  let Value::String(choice) = value else {
    return Some(format!("expected one of {:?}", field.constraints.options));
  };
  if field.constraints.options.iter().any(|o| o == choice) {
    None
  } else {
    Some(format!(
      "'{}' is not one of {:?}",
      choice, field.constraints.options
    ))
  }
}
