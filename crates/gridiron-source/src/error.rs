//! Error type for `gridiron-source`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{url} returned {status}")]
  Status { url: String, status: reqwest::StatusCode },

  /// A page of the primary provider's listing had no `items` array.
  #[error("invalid response at offset {offset}: missing `items`")]
  MissingItems { offset: usize },

  #[error("failed to decode {what}: {source}")]
  Decode {
    what:   String,
    #[source]
    source: serde_json::Error,
  },

  #[error("cache I/O error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
