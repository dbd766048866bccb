use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use flowstudio_schema::VariableSchemaDocument;

use crate::error::PersistError;
use crate::persist::Persistence;

/// Filesystem-backed persistence.
///
/// Documents are stored as pretty-printed JSON, one file per node:
/// ```text
/// {root}/
/// └── {node_id}.json
/// ```
pub struct FsPersistence {
  root: PathBuf,
}

impl FsPersistence {
  /// Create a persistence layer rooted at the given directory.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// File path for a node. Node ids are sanitized so the file always lands
  /// inside the root.
  fn document_path(&self, node_id: &str) -> PathBuf {
    let sanitized: String = node_id
      .chars()
      .map(|c| {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
          c
        } else {
          '_'
        }
      })
      .collect();
    self.root.join(format!("{}.json", sanitized))
  }
}

#[async_trait]
impl Persistence for FsPersistence {
  async fn save(
    &self,
    node_id: &str,
    document: &VariableSchemaDocument,
  ) -> Result<(), PersistError> {
    fs::create_dir_all(&self.root).await?;
    let content = serde_json::to_string_pretty(document)?;
    fs::write(self.document_path(node_id), content).await?;
    Ok(())
  }

  async fn load(&self, node_id: &str) -> Result<Option<VariableSchemaDocument>, PersistError> {
    match fs::read_to_string(self.document_path(node_id)).await {
      Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}
