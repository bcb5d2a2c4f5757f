//! Error type for `gridiron-store-sqlite`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] gridiron_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// No connection became free within the acquisition ceiling.
  #[error("timed out after {0:?} waiting for a database connection")]
  PoolTimeout(Duration),

  #[error("connection pool is closed")]
  PoolClosed,

  #[error("iteration {0:?} is already recorded")]
  DuplicateIteration(String),

  #[error("stored rating row has {found} stat columns, expected {expected}")]
  StatShape { found: usize, expected: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
