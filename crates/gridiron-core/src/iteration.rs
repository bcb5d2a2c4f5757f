//! Iterations: named, dated versions of the full rating snapshot.
//!
//! An iteration name has the form `<season>-week-<week>` (e.g. `12-week-11`).
//! It is the unit of idempotent ingestion: a name is recorded at most once.

use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

static ITERATION_ID: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(\d+)-week-(\d+)$").expect("iteration id pattern is valid")
});

// ─── Identifier ──────────────────────────────────────────────────────────────

/// The parsed components of an iteration name.
///
/// Orders by season first, then week, so the greatest value is the most
/// recent iteration.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IterationId {
  pub season_year: i64,
  pub week_number: i64,
}

impl FromStr for IterationId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidFormat(s.to_owned());
    let caps = ITERATION_ID.captures(s).ok_or_else(invalid)?;
    Ok(Self {
      season_year: caps[1].parse().map_err(|_| invalid())?,
      week_number: caps[2].parse().map_err(|_| invalid())?,
    })
  }
}

impl fmt::Display for IterationId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-week-{}", self.season_year, self.week_number)
  }
}

/// Parse an iteration name such as `12-week-11`.
pub fn parse_iteration_id(id: &str) -> Result<IterationId> { id.parse() }

// ─── Persisted iteration ─────────────────────────────────────────────────────

/// A recorded iteration. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iteration {
  pub iteration_id:      i64,
  pub name:              String,
  /// Server-assigned creation timestamp.
  pub date:              DateTime<Utc>,
  pub season_year:       i64,
  pub week_number:       i64,
  pub is_regular_season: bool,
}

/// Input to [`crate::store::RatingStore::create_iteration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIteration {
  pub name:              String,
  pub season_year:       i64,
  pub week_number:       i64,
  pub is_regular_season: bool,
}

impl NewIteration {
  /// Build a regular-season iteration from its name, failing on malformed
  /// names.
  pub fn parse(name: &str) -> Result<Self> {
    let id = parse_iteration_id(name)?;
    Ok(Self {
      name:              name.to_owned(),
      season_year:       id.season_year,
      week_number:       id.week_number,
      is_regular_season: true,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_season_and_week() {
    let id = parse_iteration_id("12-week-11").unwrap();
    assert_eq!(id.season_year, 12);
    assert_eq!(id.week_number, 11);
    assert_eq!(id.to_string(), "12-week-11");
  }

  #[test]
  fn rejects_malformed_ids() {
    for bad in ["", "week-11", "12-week-", "12-wk-11", "x-week-1", "12-week-11.json"] {
      let err = parse_iteration_id(bad).unwrap_err();
      match err {
        Error::InvalidFormat(id) => assert_eq!(id, bad),
        other => panic!("unexpected error for {bad:?}: {other}"),
      }
    }
  }

  #[test]
  fn rejects_out_of_range_numbers() {
    assert!(parse_iteration_id("99999999999999999999-week-1").is_err());
  }

  #[test]
  fn orders_by_season_then_week() {
    let a: IterationId = "12-week-9".parse().unwrap();
    let b: IterationId = "12-week-11".parse().unwrap();
    let c: IterationId = "13-week-1".parse().unwrap();
    assert!(a < b && b < c);
  }

  #[test]
  fn new_iteration_is_regular_season() {
    let it = NewIteration::parse("12-week-12").unwrap();
    assert_eq!((it.season_year, it.week_number), (12, 12));
    assert!(it.is_regular_season);
  }
}
