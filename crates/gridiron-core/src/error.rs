//! Error types for `gridiron-core`.

use thiserror::Error;

use crate::dimension::Dimension;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid iteration id format: {0:?}")]
  InvalidFormat(String),

  #[error("invalid {field}: {value}")]
  InvalidAttribute {
    field: &'static str,
    value: String,
  },

  #[error(
    "{dimension} not found: {key:?} (mapped to: {})",
    mapped.as_deref().unwrap_or("no mapping found")
  )]
  DimensionNotFound {
    dimension: Dimension,
    key:       String,
    mapped:    Option<String>,
  },
}

impl Error {
  pub fn not_found(dimension: Dimension, key: impl Into<String>) -> Self {
    Self::DimensionNotFound { dimension, key: key.into(), mapped: None }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
