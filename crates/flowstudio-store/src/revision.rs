use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use flowstudio_schema::VariableSchemaDocument;

/// A snapshot of a node's document, taken at each replace. Backs the
/// Versions tab of the node panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
  pub revision_id: String,
  pub saved_at: DateTime<Utc>,
  pub document: VariableSchemaDocument,
}

impl Revision {
  pub(crate) fn new(document: &VariableSchemaDocument) -> Self {
    Self {
      revision_id: uuid::Uuid::new_v4().to_string(),
      saved_at: Utc::now(),
      document: document.clone(),
    }
  }
}
