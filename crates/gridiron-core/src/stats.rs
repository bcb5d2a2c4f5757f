//! The rating stat catalogue.
//!
//! Each entry pairs the primary provider's stat key with the column it is
//! stored in. The order here is the column order of `player_rating`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Result, snapshot::StatEntry};

/// `(provider key, column name)` for every numeric rating stat.
pub const STAT_COLUMNS: &[(&str, &str)] = &[
  ("overall", "overall"),
  ("acceleration", "acceleration"),
  ("agility", "agility"),
  ("jumping", "jumping"),
  ("stamina", "stamina"),
  ("strength", "strength"),
  ("awareness", "awareness"),
  ("bCVision", "bcvision"),
  ("blockShedding", "block_shedding"),
  ("breakSack", "break_sack"),
  ("breakTackle", "break_tackle"),
  ("carrying", "carrying"),
  ("catchInTraffic", "catch_in_traffic"),
  ("catching", "catching"),
  ("changeOfDirection", "change_of_direction"),
  ("deepRouteRunning", "deep_route_running"),
  ("finesseMoves", "finesse_moves"),
  ("hitPower", "hit_power"),
  ("impactBlocking", "impact_blocking"),
  ("injury", "injury"),
  ("jukeMove", "juke_move"),
  ("kickAccuracy", "kick_accuracy"),
  ("kickPower", "kick_power"),
  ("kickReturn", "kick_return"),
  ("leadBlock", "lead_block"),
  ("manCoverage", "man_coverage"),
  ("mediumRouteRunning", "medium_route_running"),
  ("passBlock", "pass_block"),
  ("passBlockFinesse", "pass_block_finesse"),
  ("passBlockPower", "pass_block_power"),
  ("playAction", "play_action"),
  ("playRecognition", "play_recognition"),
  ("powerMoves", "power_moves"),
  ("press", "press"),
  ("pursuit", "pursuit"),
  ("release", "release"),
  ("runBlock", "run_block"),
  ("runBlockFinesse", "run_block_finesse"),
  ("runBlockPower", "run_block_power"),
  ("shortRouteRunning", "short_route_running"),
  ("spectacularCatch", "spectacular_catch"),
  ("speed", "speed"),
  ("spinMove", "spin_move"),
  ("stiffArm", "stiff_arm"),
  ("tackle", "tackle"),
  ("throwAccuracyDeep", "throw_accuracy_deep"),
  ("throwAccuracyMid", "throw_accuracy_mid"),
  ("throwAccuracyShort", "throw_accuracy_short"),
  ("throwOnTheRun", "throw_on_the_run"),
  ("throwPower", "throw_power"),
  ("throwUnderPressure", "throw_under_pressure"),
  ("toughness", "toughness"),
  ("trucking", "trucking"),
  ("zoneCoverage", "zone_coverage"),
];

/// Provider key holding the running-style label (a string, not a rating).
pub const RUNNING_STYLE_KEY: &str = "runningStyle";

/// One value per [`STAT_COLUMNS`] entry, in catalogue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
  values: Vec<i64>,
}

impl Default for StatLine {
  fn default() -> Self { Self { values: vec![0; STAT_COLUMNS.len()] } }
}

impl StatLine {
  /// Extract every catalogue stat from a raw stat map. Absent, null or blank
  /// stats default to 0; present but non-numeric values are rejected.
  pub fn from_stats(stats: &BTreeMap<String, StatEntry>) -> Result<Self> {
    let values = STAT_COLUMNS
      .iter()
      .map(|(key, column)| match stats.get(*key) {
        Some(entry) if !entry.value.is_blank() => entry.value.as_integer(*column),
        _ => Ok(0),
      })
      .collect::<Result<_>>()?;
    Ok(Self { values })
  }

  /// Rebuild a line from stored values in catalogue order. Returns `None`
  /// if the length does not match the catalogue.
  pub fn from_values(values: Vec<i64>) -> Option<Self> {
    (values.len() == STAT_COLUMNS.len()).then_some(Self { values })
  }

  /// The value stored for `column`, if it is a catalogue column.
  pub fn get(&self, column: &str) -> Option<i64> {
    STAT_COLUMNS
      .iter()
      .position(|(_, c)| *c == column)
      .map(|i| self.values[i])
  }

  /// `(column, value)` pairs in catalogue order.
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
    STAT_COLUMNS.iter().map(|(_, c)| *c).zip(self.values.iter().copied())
  }

  pub fn values(&self) -> &[i64] { &self.values }
}
