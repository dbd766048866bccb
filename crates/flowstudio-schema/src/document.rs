use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::definition::VariableDefinition;
use crate::error::SchemaError;

/// The variable schema for a single workflow node.
///
/// Invariant: every key in `required` has a definition in `properties`.
/// The store checks this on every replace; [`remove_variable`] keeps the two
/// maps in step so a removal can never leave a required key dangling.
///
/// Property iteration order is the map order (sorted by key), which the form
/// compiler's determinism guarantee relies on.
///
/// [`remove_variable`]: VariableSchemaDocument::remove_variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableSchemaDocument {
  #[serde(default)]
  pub properties: BTreeMap<String, VariableDefinition>,
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub required: BTreeSet<String>,
}

impl VariableSchemaDocument {
  /// The empty document: no properties, nothing required.
  pub fn new() -> Self {
    Self::default()
  }

  /// Check the document invariant.
  pub fn validate(&self) -> Result<(), SchemaError> {
    for key in &self.required {
      if !self.properties.contains_key(key) {
        return Err(SchemaError::DanglingRequiredKey { key: key.clone() });
      }
    }
    Ok(())
  }

  /// Insert or replace a variable definition, updating the required set.
  pub fn insert_variable(
    &mut self,
    key: impl Into<String>,
    definition: VariableDefinition,
    required: bool,
  ) {
    let key = key.into();
    if required {
      self.required.insert(key.clone());
    } else {
      self.required.remove(&key);
    }
    self.properties.insert(key, definition);
  }

  /// Remove a variable from `properties` and `required` together.
  pub fn remove_variable(&mut self, key: &str) -> Option<VariableDefinition> {
    self.required.remove(key);
    self.properties.remove(key)
  }

  pub fn get(&self, key: &str) -> Option<&VariableDefinition> {
    self.properties.get(key)
  }

  pub fn is_required(&self, key: &str) -> bool {
    self.required.contains(key)
  }

  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::definition::VariableKind;

  fn string_var(title: &str) -> VariableDefinition {
    VariableDefinition::new(title, VariableKind::string())
  }

  #[test]
  fn test_empty_document_is_valid() {
    assert!(VariableSchemaDocument::new().validate().is_ok());
  }

  #[test]
  fn test_validate_rejects_dangling_required_key() {
    let mut doc = VariableSchemaDocument::new();
    doc.required.insert("region".to_string());

    let result = doc.validate();
    assert!(matches!(
      result,
      Err(SchemaError::DanglingRequiredKey { key }) if key == "region"
    ));
  }

  #[test]
  fn test_insert_variable_tracks_required() {
    let mut doc = VariableSchemaDocument::new();
    doc.insert_variable("region", string_var("Region"), true);

    assert!(doc.is_required("region"));
    assert!(doc.validate().is_ok());

    // Re-inserting as optional clears the required flag.
    doc.insert_variable("region", string_var("Region"), false);
    assert!(!doc.is_required("region"));
  }

  #[test]
  fn test_remove_variable_clears_both_maps() {
    let mut doc = VariableSchemaDocument::new();
    doc.insert_variable("region", string_var("Region"), true);

    let removed = doc.remove_variable("region");
    assert!(removed.is_some());
    assert!(doc.is_empty());
    assert!(!doc.is_required("region"));
    assert!(doc.validate().is_ok());
  }
}
