//! Dimensions: the normalised lookup entities shared across players.
//!
//! Measured dimensions (height, weight, age, jersey number, years pro) are
//! keyed by an integer and created on first sight. Labelled dimensions are
//! keyed by a string and must already exist in the store.

use serde::{Deserialize, Serialize};

/// Every dimension table the store knows about.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
  // ── Measured: lookup-or-create ──────────────────────────────────────────
  Height,
  Weight,
  Age,
  JerseyNumber,
  YearsPro,

  // ── Labelled: lookup only ───────────────────────────────────────────────
  Handedness,
  Position,
  Team,
  College,
  Archetype,
  Ability,
  RunningStyle,
  DevelopmentTrait,
}

impl Dimension {
  /// Whether unseen natural keys are inserted rather than rejected.
  pub fn is_measured(self) -> bool {
    matches!(
      self,
      Self::Height | Self::Weight | Self::Age | Self::JerseyNumber | Self::YearsPro
    )
  }

  /// Display string stored alongside a measured natural key.
  ///
  /// Returns `None` for labelled dimensions, whose key is its own display.
  pub fn display_value(self, value: i64) -> Option<String> {
    let display = match self {
      Self::Height => format!("{}'{}\"", value / 12, value % 12),
      Self::Weight => format!("{value} lbs"),
      Self::Age => format!("{value} yrs"),
      Self::JerseyNumber => format!("{value:02}"),
      Self::YearsPro if value == 0 => "Rookie".to_owned(),
      Self::YearsPro => format!("{value} years"),
      _ => return None,
    };
    Some(display)
  }
}

/// Label used when a player carries no archetype or running style.
pub const NONE_LABEL: &str = "None";

/// Handedness label for the provider's binary code. `0` is left-handed.
pub fn handedness_label(code: i64) -> &'static str {
  if code == 0 { "Left" } else { "Right" }
}
