use async_trait::async_trait;

use flowstudio_schema::VariableSchemaDocument;

use crate::error::PersistError;

/// External persistence collaborator.
///
/// The submission pipeline awaits [`save`] before the editing session is
/// allowed back to the list view. A failure is recoverable: the caller
/// surfaces the message and leaves its own state untouched. Retry and
/// backoff policy belong to the implementation, not the caller.
///
/// [`save`]: Persistence::save
#[async_trait]
pub trait Persistence: Send + Sync {
  /// Persist the full document for a node.
  async fn save(
    &self,
    node_id: &str,
    document: &VariableSchemaDocument,
  ) -> Result<(), PersistError>;

  /// Load the persisted document for a node, if any.
  async fn load(&self, node_id: &str) -> Result<Option<VariableSchemaDocument>, PersistError>;
}
