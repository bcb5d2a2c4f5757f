//! Error type for `gridiron-sync`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Source(#[from] gridiron_source::Error),

  #[error(transparent)]
  Core(#[from] gridiron_core::Error),

  #[error("no cached primary iteration in {}", .0.display())]
  NoCachedIteration(PathBuf),

  /// Reconciliation targets an iteration that was never ingested.
  #[error("iteration {0:?} has not been ingested")]
  IterationNotPersisted(String),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("failed to read mappings file {}: {source}", path.display())]
  MappingsIo {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid mappings file {}: {source}", path.display())]
  MappingsParse {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
