//! Normalised and persisted player records.

use serde::{Deserialize, Serialize};

use crate::stats::StatLine;

/// A player whose attributes have been resolved to dimension ids, ready to be
/// committed for an iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPlayer {
  pub player_id:        i64,
  pub first_name:       String,
  pub last_name:        String,
  pub height_id:        i64,
  pub weight_id:        i64,
  pub age_id:           i64,
  pub jersey_number_id: i64,
  pub years_pro_id:     i64,
  pub handedness_id:    i64,
  pub position_id:      i64,
  pub team_id:          i64,
  pub college_id:       i64,
  pub archetype_id:     i64,
  /// Ability labels; resolved at commit time, unknown labels are skipped.
  pub abilities:        Vec<String>,
  /// Running-style label; `None` falls back to the `"None"` style.
  pub running_style:    Option<String>,
  pub stats:            StatLine,
}

/// The current attributes of a player. Last write wins, independent of
/// iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
  pub player_id:        i64,
  pub first_name:       String,
  pub last_name:        String,
  pub height_id:        i64,
  pub weight_id:        i64,
  pub age_id:           i64,
  pub college_id:       Option<i64>,
  pub handedness_id:    i64,
  pub jersey_number_id: i64,
  pub years_pro_id:     i64,
  pub position_id:      i64,
  pub team_id:          i64,
}

/// A player's ratings for one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
  pub player_id:            i64,
  pub iteration_id:         i64,
  pub development_trait_id: i64,
  pub style_id:             i64,
  pub stats:                StatLine,
}

/// A player's current attributes with every dimension rendered as its
/// display string. Computed on read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
  pub player_id:     i64,
  pub first_name:    String,
  pub last_name:     String,
  pub height:        String,
  pub weight:        String,
  pub age:           String,
  pub jersey_number: String,
  pub years_pro:     String,
  pub handedness:    String,
  pub position:      String,
  pub team:          String,
  pub college:       Option<String>,
}
