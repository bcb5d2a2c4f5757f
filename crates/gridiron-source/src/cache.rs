//! On-disk JSON caches for provider payloads.
//!
//! A cache entry is `<dir>/<name>.json`. Presence is an unconditional hit;
//! nothing is ever invalidated.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use gridiron_core::iteration::IterationId;
use serde::Serialize;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct FileCache {
  dir: PathBuf,
}

impl FileCache {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn path(&self, name: &str) -> PathBuf { self.dir.join(format!("{name}.json")) }

  /// The cached payload for `name`, or `None` if there is no entry.
  pub async fn read(&self, name: &str) -> Result<Option<serde_json::Value>> {
    let path = self.path(name);
    let bytes = match tokio::fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(source) => return Err(Error::Io { path, source }),
    };
    serde_json::from_slice(&bytes)
      .map(Some)
      .map_err(|source| Error::Decode { what: path.display().to_string(), source })
  }

  /// Write `value` as pretty-printed JSON, creating the directory if needed.
  pub async fn write(&self, name: &str, value: &impl Serialize) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&self.dir)
      .await
      .map_err(|source| Error::Io { path: self.dir.clone(), source })?;

    let path = self.path(name);
    let json = serde_json::to_vec_pretty(value)
      .map_err(|source| Error::Decode { what: path.display().to_string(), source })?;
    tokio::fs::write(&path, json)
      .await
      .map_err(|source| Error::Io { path: path.clone(), source })?;

    tracing::info!(path = %path.display(), "cached provider payload");
    Ok(path)
  }
}

/// The most recent primary iteration present in `dir`, judged by the
/// `<season>-week-<week>.json` file names (season first, then week).
///
/// Files with any other name are ignored. A missing directory has no
/// iterations.
pub async fn latest_cached_iteration(dir: &Path) -> Result<Option<(IterationId, String)>> {
  let io_err = |source| Error::Io { path: dir.to_path_buf(), source };

  let mut entries = match tokio::fs::read_dir(dir).await {
    Ok(entries) => entries,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(io_err(e)),
  };

  let mut latest: Option<(IterationId, String)> = None;
  while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
    let path = entry.path();
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
      continue;
    }
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
      continue;
    };
    let Ok(id) = stem.parse::<IterationId>() else {
      continue;
    };
    if latest.as_ref().is_none_or(|(best, _)| id > *best) {
      latest = Some((id, stem.to_owned()));
    }
  }
  Ok(latest)
}
