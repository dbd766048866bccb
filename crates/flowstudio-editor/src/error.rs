use std::collections::BTreeMap;

use thiserror::Error;

use flowstudio_store::{PersistError, StoreError};

/// Errors surfaced by the node editor. All are recoverable: the session and
/// store are left consistent and the message is for the UI to display.
#[derive(Debug, Error)]
pub enum EditorError {
  /// One or more submitted fields failed validation. Blocks submission only.
  #[error("validation failed for {} field(s)", errors.len())]
  ValidationFailed { errors: BTreeMap<String, String> },

  /// A created variable's key collides with an existing one.
  #[error("variable key already exists: {key}")]
  DuplicateKey { key: String },

  /// The referenced variable is not in the current document.
  #[error("unknown variable: {key}")]
  UnknownVariable { key: String },

  /// No create/edit session is active.
  #[error("no variable is being created or edited")]
  NotEditing,

  /// No node is currently selected.
  #[error("no node selected")]
  NoNodeSelected,

  /// A submission is in flight; node switches and new edits are rejected
  /// rather than silently discarding the in-flight work.
  #[error("a submission is pending")]
  SubmissionPending,

  #[error(transparent)]
  Store(#[from] StoreError),

  /// External save failed; the message is surfaced verbatim.
  #[error("persistence failed: {0}")]
  Persistence(#[from] PersistError),
}
