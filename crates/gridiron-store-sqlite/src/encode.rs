//! Encoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; booleans as 0/1 integers;
//! stat lines as one column per catalogue entry.
//! Dimension enums map onto their table, id and natural-key columns.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use gridiron_core::{
  dimension::Dimension,
  iteration::Iteration,
  player::RatingRecord,
  stats::{STAT_COLUMNS, StatLine},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Fixed-width so stored timestamps sort lexically in time order.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Dimension tables ────────────────────────────────────────────────────────

/// Where a dimension lives in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionTable {
  pub table:   &'static str,
  pub id:      &'static str,
  /// Natural-key column.
  pub key:     &'static str,
  /// Display column; measured dimensions only.
  pub display: Option<&'static str>,
}

const fn measured(
  table: &'static str,
  id: &'static str,
  key: &'static str,
  display: &'static str,
) -> DimensionTable {
  DimensionTable { table, id, key, display: Some(display) }
}

const fn labelled(table: &'static str, id: &'static str, key: &'static str) -> DimensionTable {
  DimensionTable { table, id, key, display: None }
}

pub fn dimension_table(dimension: Dimension) -> DimensionTable {
  match dimension {
    Dimension::Height => measured("player_height", "height_id", "height_inches", "display_height"),
    Dimension::Weight => measured("player_weight", "weight_id", "weight_lbs", "display_weight"),
    Dimension::Age => measured("player_age", "age_id", "age_years", "display_age"),
    Dimension::JerseyNumber => {
      measured("jersey_number", "jersey_number_id", "number", "display_number")
    }
    Dimension::YearsPro => measured("years_pro", "years_pro_id", "years", "display_years"),
    Dimension::Handedness => labelled("handedness", "handedness_id", "handedness"),
    Dimension::Position => labelled("position", "position_id", "position"),
    Dimension::Team => labelled("team", "team_id", "team_label"),
    Dimension::College => labelled("college", "college_id", "college_name"),
    Dimension::Archetype => labelled("archetype", "archetype_id", "archetype"),
    Dimension::Ability => labelled("ability", "ability_id", "ability"),
    Dimension::RunningStyle => labelled("running_style", "style_id", "style_name"),
    Dimension::DevelopmentTrait => {
      labelled("development_trait", "development_trait_id", "trait_name")
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const ITERATION_COLUMNS: &str =
  "iteration_id, iteration_name, iteration_date, season_year, week_number, is_regular_season";

/// Raw values read directly from a `rating_iteration` row.
pub struct RawIteration {
  pub iteration_id:      i64,
  pub name:              String,
  pub date:              String,
  pub season_year:       i64,
  pub week_number:       i64,
  pub is_regular_season: bool,
}

impl RawIteration {
  /// Map a row selected with [`ITERATION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      iteration_id:      row.get(0)?,
      name:              row.get(1)?,
      date:              row.get(2)?,
      season_year:       row.get(3)?,
      week_number:       row.get(4)?,
      is_regular_season: row.get(5)?,
    })
  }

  pub fn into_iteration(self) -> Result<Iteration> {
    Ok(Iteration {
      iteration_id:      self.iteration_id,
      name:              self.name,
      date:              decode_dt(&self.date)?,
      season_year:       self.season_year,
      week_number:       self.week_number,
      is_regular_season: self.is_regular_season,
    })
  }
}

/// `SELECT` of a rating row: the four key columns, then every catalogue stat.
pub static SELECT_RATING: LazyLock<String> = LazyLock::new(|| {
  let columns = STAT_COLUMNS
    .iter()
    .map(|(_, column)| *column)
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "SELECT player_id, iteration_id, development_trait_id, style_id, {columns} \
     FROM player_rating WHERE player_id = ?1 AND iteration_id = ?2"
  )
});

/// Raw values read from a `player_rating` row selected with
/// [`SELECT_RATING`].
pub struct RawRating {
  pub player_id:            i64,
  pub iteration_id:         i64,
  pub development_trait_id: i64,
  pub style_id:             i64,
  pub stats:                Vec<i64>,
}

impl RawRating {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let stats = (0..STAT_COLUMNS.len())
      .map(|i| row.get(i + 4))
      .collect::<rusqlite::Result<_>>()?;
    Ok(Self {
      player_id: row.get(0)?,
      iteration_id: row.get(1)?,
      development_trait_id: row.get(2)?,
      style_id: row.get(3)?,
      stats,
    })
  }

  pub fn into_rating(self) -> Result<RatingRecord> {
    let found = self.stats.len();
    let stats = StatLine::from_values(self.stats)
      .ok_or(Error::StatShape { found, expected: STAT_COLUMNS.len() })?;
    Ok(RatingRecord {
      player_id: self.player_id,
      iteration_id: self.iteration_id,
      development_trait_id: self.development_trait_id,
      style_id: self.style_id,
      stats,
    })
  }
}
