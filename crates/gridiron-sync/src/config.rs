//! Layered configuration: TOML file, then `GRIDIRON_*` environment
//! variables. Every field has a default, so both layers are optional.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use gridiron_core::mappings::NameMappings;
use gridiron_source::{PrimaryOptions, SecondaryOptions};
use gridiron_store_sqlite::PoolOptions;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable prefix; nested keys use `__`, e.g.
/// `GRIDIRON_PRIMARY__PAGE_DELAY_MS=0`.
pub const ENV_PREFIX: &str = "GRIDIRON";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  pub database_path:     PathBuf,
  pub pool:              PoolConfig,
  pub http_timeout_secs: u64,
  pub primary:           PrimaryOptions,
  pub secondary:         SecondaryOptions,
  /// Extra team/college mappings layered over the built-in tables.
  pub mappings_path:     Option<PathBuf>,
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      database_path:     PathBuf::from("gridiron.db"),
      pool:              PoolConfig::default(),
      http_timeout_secs: 30,
      primary:           PrimaryOptions::default(),
      secondary:         SecondaryOptions::default(),
      mappings_path:     None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
  pub max_connections:      usize,
  pub acquire_timeout_ms:   u64,
  pub busy_timeout_ms:      u64,
}

impl Default for PoolConfig {
  fn default() -> Self {
    let options = PoolOptions::default();
    Self {
      max_connections:      options.max_connections,
      acquire_timeout_ms:   options.acquire_timeout.as_millis() as u64,
      busy_timeout_ms:      options.busy_timeout.as_millis() as u64,
    }
  }
}

impl SyncConfig {
  /// Read `path` (if it exists) and overlay the environment.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn pool_options(&self) -> PoolOptions {
    PoolOptions {
      max_connections:   self.pool.max_connections,
      acquire_timeout:   Duration::from_millis(self.pool.acquire_timeout_ms),
      busy_timeout:      Duration::from_millis(self.pool.busy_timeout_ms),
    }
  }

  pub fn http_timeout(&self) -> Duration { Duration::from_secs(self.http_timeout_secs) }

  /// The built-in mapping tables, extended by the mappings file if one is
  /// configured.
  pub fn load_mappings(&self) -> Result<NameMappings> {
    let builtin = NameMappings::builtin();
    let Some(path) = &self.mappings_path else {
      return Ok(builtin);
    };

    let text = std::fs::read_to_string(path)
      .map_err(|source| Error::MappingsIo { path: path.clone(), source })?;
    let extra: NameMappings = toml::from_str(&text)
      .map_err(|source| Error::MappingsParse { path: path.clone(), source })?;
    tracing::info!(
      path = %path.display(),
      teams = extra.teams.len(),
      colleges = extra.colleges.len(),
      overrides = extra.college_overrides.len(),
      "loaded extra name mappings"
    );
    Ok(builtin.merged(extra))
  }
}
