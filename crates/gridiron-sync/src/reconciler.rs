//! Cross-source reconciliation: backfill development traits and draft picks
//! for the most recently cached primary iteration.

use gridiron_core::{
  reconcile::{plan_development_traits, plan_draft_picks},
  store::RatingStore,
};
use gridiron_source::{
  SecondaryFetcher, SnapshotFetcher, cache::latest_cached_iteration, client::http_client,
};

use crate::{Error, Result, config::SyncConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraitReport {
  /// Rating rows whose development trait was set.
  pub updated:       usize,
  pub unmatched:     usize,
  pub unknown_codes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftReport {
  pub inserted:         usize,
  pub already_assigned: usize,
  /// Players given the last pick because no candidate pick was known.
  pub defaulted:        usize,
  /// Players whose earliest candidate pick was out of range.
  pub discarded:        usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
  pub iteration: String,
  pub week:      i64,
  pub traits:    TraitReport,
  pub draft:     DraftReport,
}

pub struct Reconciler<S> {
  store:     S,
  primary:   SnapshotFetcher,
  secondary: SecondaryFetcher,
}

impl<S: RatingStore> Reconciler<S> {
  pub fn new(store: S, primary: SnapshotFetcher, secondary: SecondaryFetcher) -> Self {
    Self { store, primary, secondary }
  }

  pub fn from_config(store: S, config: &SyncConfig) -> Result<Self> {
    let client = http_client(config.http_timeout())?;
    Ok(Self::new(
      store,
      SnapshotFetcher::new(client.clone(), &config.primary),
      SecondaryFetcher::new(client, &config.secondary),
    ))
  }

  pub fn store(&self) -> &S { &self.store }

  /// Run the development-trait pass, then the draft pass. Each pass commits
  /// on its own; a failing draft pass leaves the trait updates in place.
  pub async fn run(&self) -> Result<ReconcileReport> {
    let cache_dir = self.primary.cache().dir();
    let (id, name) = latest_cached_iteration(cache_dir)
      .await?
      .ok_or_else(|| Error::NoCachedIteration(cache_dir.to_path_buf()))?;
    let primary = self
      .primary
      .cached(&name)
      .await?
      .ok_or_else(|| Error::NoCachedIteration(cache_dir.to_path_buf()))?;

    let iteration = self
      .store
      .iteration_by_name(&name)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::IterationNotPersisted(name.clone()))?;

    let secondary = self.secondary.fetch_week(id.week_number).await?;
    tracing::info!(
      iteration = %name,
      week = id.week_number,
      primary = primary.len(),
      secondary = secondary.len(),
      "reconciling"
    );

    // ── Development traits ───────────────────────────────────────────────
    let plan = plan_development_traits(&primary, &secondary);
    for unknown in &plan.unknown_codes {
      tracing::warn!(
        player_id = unknown.player_id,
        player = %unknown.name,
        code = unknown.code,
        "unknown development trait code; skipped"
      );
    }
    for player in &plan.unmatched {
      tracing::debug!(%player, "no exact match in secondary dataset");
    }
    let updated = self
      .store
      .apply_development_traits(iteration.iteration_id, plan.assignments)
      .await
      .map_err(Error::store)?;
    let traits = TraitReport {
      updated,
      unmatched: plan.unmatched.len(),
      unknown_codes: plan.unknown_codes.len(),
    };
    tracing::info!(
      updated = traits.updated,
      unmatched = traits.unmatched,
      unknown_codes = traits.unknown_codes,
      "development traits reconciled"
    );

    // ── Draft picks ──────────────────────────────────────────────────────
    let plan = plan_draft_picks(&primary, &secondary);
    let written = self
      .store
      .assign_draft_picks(plan.assignments)
      .await
      .map_err(Error::store)?;
    let draft = DraftReport {
      inserted: written.inserted,
      already_assigned: written.already_assigned,
      defaulted: plan.defaulted,
      discarded: plan.discarded,
    };
    tracing::info!(
      inserted = draft.inserted,
      already_assigned = draft.already_assigned,
      defaulted = draft.defaulted,
      discarded = draft.discarded,
      "draft picks reconciled"
    );

    Ok(ReconcileReport { iteration: name, week: id.week_number, traits, draft })
  }
}
