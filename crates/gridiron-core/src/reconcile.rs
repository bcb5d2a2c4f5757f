//! Cross-source reconciliation rules.
//!
//! Primary-source players are paired with a secondary dataset by strict
//! exact match, then used to backfill development traits and draft
//! positions. This module only plans the writes; the store applies them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::PlayerSnapshot;

/// Draft rounds × picks per round.
pub const DRAFT_ROUNDS: i64 = 54;
pub const PICKS_PER_ROUND: i64 = 32;
/// The last possible pick; also the sentinel for players with no known pick.
pub const LAST_PICK: i64 = DRAFT_ROUNDS * PICKS_PER_ROUND;

/// Development trait assigned when a rating row is first written (`Normal`).
pub const DEFAULT_DEVELOPMENT_TRAIT_ID: i64 = 1;

/// Map the secondary source's trait code to a `development_trait` id.
pub fn development_trait_id(code: i64) -> Option<i64> {
  match code {
    0 => Some(1), // Normal
    1 => Some(2), // Star
    2 => Some(3), // Superstar
    3 => Some(4), // X-Factor
    _ => None,
  }
}

// ─── Secondary dataset ───────────────────────────────────────────────────────

/// One player as described by the secondary dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryPlayer {
  #[serde(default)]
  pub roster_id:         Option<String>,
  pub first_name:        String,
  pub last_name:         String,
  pub position:          String,
  pub height:            i64,
  pub weight:            i64,
  pub age:               i64,
  pub years_pro:         i64,
  pub trait_development: i64,
  #[serde(default)]
  pub draft_positions:   Vec<i64>,
}

// ─── Exact match ─────────────────────────────────────────────────────────────

/// The tuple two descriptions must share to be considered the same player.
/// Names compare case-insensitively; everything else exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
  first_name: String,
  last_name:  String,
  position:   String,
  height:     i64,
  weight:     i64,
  age:        i64,
  years_pro:  i64,
}

impl MatchKey {
  /// Returns `None` when a numeric attribute is unusable; such a player
  /// cannot match anything.
  pub fn of_primary(player: &PlayerSnapshot) -> Option<Self> {
    Some(Self {
      first_name: player.first_name.to_lowercase(),
      last_name:  player.last_name.to_lowercase(),
      position:   player.position.id.clone(),
      height:     player.height.as_integer("height").ok()?,
      weight:     player.weight.as_integer("weight").ok()?,
      age:        player.age.as_integer("age").ok()?,
      years_pro:  player.years_pro.as_integer("years_pro").ok()?,
    })
  }

  pub fn of_secondary(player: &SecondaryPlayer) -> Self {
    Self {
      first_name: player.first_name.to_lowercase(),
      last_name:  player.last_name.to_lowercase(),
      position:   player.position.clone(),
      height:     player.height,
      weight:     player.weight,
      age:        player.age,
      years_pro:  player.years_pro,
    }
  }
}

/// Whether two descriptions refer to the same player. No partial credit.
pub fn is_exact_match(primary: &PlayerSnapshot, secondary: &SecondaryPlayer) -> bool {
  MatchKey::of_primary(primary)
    .is_some_and(|key| key == MatchKey::of_secondary(secondary))
}

/// Index over a secondary dataset; the first candidate with a given key wins.
pub struct SecondaryIndex<'a> {
  by_key: HashMap<MatchKey, &'a SecondaryPlayer>,
}

impl<'a> SecondaryIndex<'a> {
  pub fn new(players: &'a [SecondaryPlayer]) -> Self {
    let mut by_key = HashMap::with_capacity(players.len());
    for player in players {
      by_key.entry(MatchKey::of_secondary(player)).or_insert(player);
    }
    Self { by_key }
  }

  pub fn find(&self, primary: &PlayerSnapshot) -> Option<&'a SecondaryPlayer> {
    MatchKey::of_primary(primary).and_then(|key| self.by_key.get(&key).copied())
  }
}

// ─── Development traits ──────────────────────────────────────────────────────

/// A targeted update of one rating row's development trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitAssignment {
  pub player_id:            i64,
  pub development_trait_id: i64,
}

/// A trait code with no corresponding dimension row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTrait {
  pub player_id: i64,
  pub name:      String,
  pub code:      i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitPlan {
  pub assignments:   Vec<TraitAssignment>,
  pub unknown_codes: Vec<UnknownTrait>,
  pub unmatched:     Vec<String>,
}

/// Pair every primary player with the secondary dataset and translate the
/// matched trait codes.
pub fn plan_development_traits(
  primary: &[PlayerSnapshot],
  secondary: &[SecondaryPlayer],
) -> TraitPlan {
  let index = SecondaryIndex::new(secondary);
  let mut plan = TraitPlan::default();

  for player in primary {
    let Some(matched) = index.find(player) else {
      plan
        .unmatched
        .push(format!("{} ({})", player.full_name(), player.position.id));
      continue;
    };
    match development_trait_id(matched.trait_development) {
      Some(development_trait_id) => plan.assignments.push(TraitAssignment {
        player_id: player.id,
        development_trait_id,
      }),
      None => plan.unknown_codes.push(UnknownTrait {
        player_id: player.id,
        name:      player.full_name(),
        code:      matched.trait_development,
      }),
    }
  }
  plan
}

// ─── Draft positions ─────────────────────────────────────────────────────────

/// A player's canonical draft pick, written at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAssignment {
  pub player_id:    i64,
  /// Overall pick in `1..=LAST_PICK`.
  pub overall_pick: i64,
}

/// How a single player's draft pick was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftResolution {
  /// The earliest candidate pick, within bounds.
  Picked(i64),
  /// No match or no candidates; the player gets [`LAST_PICK`].
  Defaulted,
  /// The earliest candidate was out of bounds; nothing is written.
  Discarded(i64),
}

impl DraftResolution {
  pub fn overall_pick(self) -> Option<i64> {
    match self {
      Self::Picked(pick) => Some(pick),
      Self::Defaulted => Some(LAST_PICK),
      Self::Discarded(_) => None,
    }
  }
}

/// Decide the canonical pick from a match's candidate positions.
pub fn resolve_draft(candidates: Option<&[i64]>) -> DraftResolution {
  match candidates.and_then(|c| c.iter().copied().min()) {
    Some(pick) if (1..=LAST_PICK).contains(&pick) => DraftResolution::Picked(pick),
    Some(pick) => DraftResolution::Discarded(pick),
    None => DraftResolution::Defaulted,
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPlan {
  pub assignments: Vec<DraftAssignment>,
  pub picked:      usize,
  pub defaulted:   usize,
  pub discarded:   usize,
}

pub fn plan_draft_picks(
  primary: &[PlayerSnapshot],
  secondary: &[SecondaryPlayer],
) -> DraftPlan {
  let index = SecondaryIndex::new(secondary);
  let mut plan = DraftPlan::default();

  for player in primary {
    let candidates = index.find(player).map(|m| m.draft_positions.as_slice());
    let resolution = resolve_draft(candidates);
    match resolution {
      DraftResolution::Picked(_) => plan.picked += 1,
      DraftResolution::Defaulted => plan.defaulted += 1,
      DraftResolution::Discarded(_) => plan.discarded += 1,
    }
    if let Some(overall_pick) = resolution.overall_pick() {
      plan.assignments.push(DraftAssignment { player_id: player.id, overall_pick });
    }
  }
  plan
}
