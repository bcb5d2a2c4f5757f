//! One sync run: resolve the current iteration, fetch it, and ingest it
//! unless it is empty or already recorded.

use gridiron_core::{
  iteration::{Iteration, NewIteration},
  store::RatingStore,
};
use gridiron_source::{IterationResolver, SnapshotFetcher, client::http_client};

use crate::{Error, Result, config::SyncConfig};

/// What a sync run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
  /// The provider returned no players; nothing was written.
  NoData { iteration: String },
  /// The iteration is already the latest recorded one; nothing was written.
  UpToDate { iteration: String },
  Ingested { iteration: Iteration, players: usize },
}

pub struct Orchestrator<S> {
  store:    S,
  resolver: IterationResolver,
  fetcher:  SnapshotFetcher,
}

impl<S: RatingStore> Orchestrator<S> {
  pub fn new(store: S, resolver: IterationResolver, fetcher: SnapshotFetcher) -> Self {
    Self { store, resolver, fetcher }
  }

  /// Wire the HTTP collaborators from configuration.
  pub fn from_config(store: S, config: &SyncConfig) -> Result<Self> {
    let client = http_client(config.http_timeout())?;
    let resolver = IterationResolver::new(
      client.clone(),
      config.primary.ratings_page_url.clone(),
      config.primary.fallback_iteration.clone(),
    );
    let fetcher = SnapshotFetcher::new(client, &config.primary);
    Ok(Self::new(store, resolver, fetcher))
  }

  pub fn store(&self) -> &S { &self.store }

  pub async fn run(&self) -> Result<SyncOutcome> {
    let name = self.resolver.current_iteration().await;
    let players = self.fetcher.fetch_snapshot(&name).await?;

    if players.is_empty() {
      tracing::info!(iteration = %name, "no players in iteration; nothing to do");
      return Ok(SyncOutcome::NoData { iteration: name });
    }

    let latest = self.store.latest_iteration().await.map_err(Error::store)?;
    if latest.is_some_and(|latest| latest.name == name) {
      tracing::info!(iteration = %name, "iteration already recorded; nothing to do");
      return Ok(SyncOutcome::UpToDate { iteration: name });
    }
    // A fallback name can trail the latest iteration.
    if self.store.iteration_by_name(&name).await.map_err(Error::store)?.is_some() {
      tracing::warn!(iteration = %name, "stale iteration already recorded; nothing to do");
      return Ok(SyncOutcome::UpToDate { iteration: name });
    }

    let input = NewIteration::parse(&name)?;
    let summary = self
      .store
      .ingest(input, players)
      .await
      .map_err(Error::store)?;

    Ok(SyncOutcome::Ingested { iteration: summary.iteration, players: summary.players })
  }
}
