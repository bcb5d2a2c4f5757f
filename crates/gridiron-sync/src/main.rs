//! `gridiron` batch binary.
//!
//! Reads `gridiron.toml` (or the path given with `--config`), opens the
//! SQLite store, and runs one sync or reconciliation pass.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gridiron_store_sqlite::SqliteStore;
use gridiron_sync::{Orchestrator, Reconciler, SyncConfig, SyncOutcome};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Gridiron rating sync")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "gridiron.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Ingest the provider's current iteration if it is new.
  Sync,
  /// Backfill development traits and draft picks for the latest cached
  /// iteration.
  Reconcile,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let config = SyncConfig::load(&cli.config).context("failed to load configuration")?;
  let mappings = config.load_mappings().context("failed to load name mappings")?;

  let db_path = expand_tilde(&config.database_path);
  let store = SqliteStore::open(&db_path, config.pool_options())
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?
    .with_mappings(mappings);

  let result = run(cli.command, store.clone(), &config).await;
  store.close().await.context("failed to close store")?;
  result
}

async fn run(command: Command, store: SqliteStore, config: &SyncConfig) -> anyhow::Result<()> {
  match command {
    Command::Sync => {
      let outcome = Orchestrator::from_config(store, config)?
        .run()
        .await
        .context("sync failed")?;
      match outcome {
        SyncOutcome::NoData { iteration } => {
          tracing::info!(%iteration, "provider returned no players")
        }
        SyncOutcome::UpToDate { iteration } => tracing::info!(%iteration, "already up to date"),
        SyncOutcome::Ingested { iteration, players } => {
          tracing::info!(iteration = %iteration.name, players, "sync complete")
        }
      }
    }
    Command::Reconcile => {
      let report = Reconciler::from_config(store, config)?
        .run()
        .await
        .context("reconciliation failed")?;
      tracing::info!(
        iteration = %report.iteration,
        week = report.week,
        traits_updated = report.traits.updated,
        draft_inserted = report.draft.inserted,
        "reconciliation complete"
      );
    }
  }
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
