use thiserror::Error;

use flowstudio_schema::SchemaError;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The supplied document violates the schema invariant.
  #[error("invalid document: {0}")]
  InvalidDocument(#[from] SchemaError),
}

/// Error type for the persistence collaborator.
#[derive(Debug, Error)]
pub enum PersistError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Serialize(#[from] serde_json::Error),
}
