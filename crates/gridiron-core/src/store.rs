//! The `RatingStore` trait and its summary types.
//!
//! The trait is implemented by storage backends (e.g.
//! `gridiron-store-sqlite`). The sync layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  dimension::Dimension,
  iteration::{Iteration, NewIteration},
  player::{NormalizedPlayer, PlayerProfile, PlayerRecord, RatingRecord},
  reconcile::{DraftAssignment, TraitAssignment},
  snapshot::PlayerSnapshot,
};

// ─── Summaries ───────────────────────────────────────────────────────────────

/// Result of [`RatingStore::ingest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
  pub iteration: Iteration,
  pub players:   usize,
}

/// Result of [`RatingStore::assign_draft_picks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftWriteSummary {
  pub inserted:         usize,
  /// Players that already had a draft assignment; left untouched.
  pub already_assigned: usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a rating store backend.
///
/// Rating rows are written once per player per iteration; the only later
/// mutation is the development-trait backfill. Draft assignments are
/// write-once for the lifetime of a player.
pub trait RatingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Iterations ────────────────────────────────────────────────────────

  /// The most recently recorded iteration, by date.
  fn latest_iteration(
    &self,
  ) -> impl Future<Output = Result<Option<Iteration>, Self::Error>> + Send + '_;

  fn iteration_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Iteration>, Self::Error>> + Send + 'a;

  /// All recorded iterations, oldest first.
  fn list_iterations(
    &self,
  ) -> impl Future<Output = Result<Vec<Iteration>, Self::Error>> + Send + '_;

  /// Record a new iteration dated now.
  fn create_iteration(
    &self,
    input: NewIteration,
  ) -> impl Future<Output = Result<Iteration, Self::Error>> + Send + '_;

  // ── Ingestion ─────────────────────────────────────────────────────────

  /// Resolve a player's raw attributes to dimension ids, creating measured
  /// dimension rows on first sight.
  fn normalize<'a>(
    &'a self,
    player: &'a PlayerSnapshot,
  ) -> impl Future<Output = Result<NormalizedPlayer, Self::Error>> + Send + 'a;

  /// Write a normalised player's identity, rating, abilities and archetype
  /// for an iteration. All or nothing.
  fn commit(
    &self,
    player: NormalizedPlayer,
    iteration_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Create the iteration and normalise + commit every player in one
  /// transaction. If any player fails nothing is recorded.
  fn ingest(
    &self,
    iteration: NewIteration,
    players: Vec<PlayerSnapshot>,
  ) -> impl Future<Output = Result<IngestSummary, Self::Error>> + Send + '_;

  // ── Reconciliation ────────────────────────────────────────────────────

  /// Update the development trait of existing rating rows for
  /// `iteration_id` in one transaction. Returns the number of rows changed.
  fn apply_development_traits(
    &self,
    iteration_id: i64,
    assignments: Vec<TraitAssignment>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Insert draft assignments for players that have none yet, in one
  /// transaction.
  fn assign_draft_picks(
    &self,
    assignments: Vec<DraftAssignment>,
  ) -> impl Future<Output = Result<DraftWriteSummary, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Id of the labelled or measured dimension row for `key`, if present.
  fn lookup<'a>(
    &'a self,
    dimension: Dimension,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  fn get_player(
    &self,
    player_id: i64,
  ) -> impl Future<Output = Result<Option<PlayerRecord>, Self::Error>> + Send + '_;

  /// The player's current attributes rendered through their dimension rows.
  fn player_profile(
    &self,
    player_id: i64,
  ) -> impl Future<Output = Result<Option<PlayerProfile>, Self::Error>> + Send + '_;

  fn get_rating(
    &self,
    player_id: i64,
    iteration_id: i64,
  ) -> impl Future<Output = Result<Option<RatingRecord>, Self::Error>> + Send + '_;

  /// Ability ids assigned to a player for an iteration.
  fn player_abilities(
    &self,
    player_id: i64,
    iteration_id: i64,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  fn player_archetype(
    &self,
    player_id: i64,
    iteration_id: i64,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  /// The player's canonical overall draft pick, if assigned.
  fn draft_pick(
    &self,
    player_id: i64,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;
}
