use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
  #[error("required key has no definition: {key}")]
  DanglingRequiredKey { key: String },
}
