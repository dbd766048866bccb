use std::collections::HashMap;

use flowstudio_schema::VariableSchemaDocument;

use crate::error::StoreError;
use crate::revision::Revision;

/// Owns the canonical schema document for each node.
///
/// A document belongs exclusively to one node and is replaced wholesale when
/// the editor commits; callers supply the full next document, already
/// computed from the previous one.
#[derive(Debug, Default)]
pub struct SchemaStore {
  documents: HashMap<String, VariableSchemaDocument>,
  revisions: HashMap<String, Vec<Revision>>,
}

impl SchemaStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// The document for a node. A node with no schema yet reads as the empty
  /// document.
  pub fn get(&self, node_id: &str) -> VariableSchemaDocument {
    self.documents.get(node_id).cloned().unwrap_or_default()
  }

  /// Whether the node has a stored document, as opposed to the empty
  /// default [`get`] hands out.
  ///
  /// [`get`]: SchemaStore::get
  pub fn contains(&self, node_id: &str) -> bool {
    self.documents.contains_key(node_id)
  }

  /// Atomically substitute the node's entire document.
  ///
  /// The document invariant is checked before the swap; a rejected document
  /// leaves the store untouched. Every accepted replace appends a revision.
  pub fn replace(
    &mut self,
    node_id: &str,
    document: VariableSchemaDocument,
  ) -> Result<(), StoreError> {
    document.validate()?;
    self
      .revisions
      .entry(node_id.to_string())
      .or_default()
      .push(Revision::new(&document));
    self.documents.insert(node_id.to_string(), document);
    Ok(())
  }

  /// Append-only revision history for a node, oldest first.
  pub fn revisions(&self, node_id: &str) -> &[Revision] {
    self
      .revisions
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }
}
