//! Player snapshots, the raw records returned by the primary provider.
//!
//! A snapshot is never persisted as-is; it is normalised against the
//! dimension model and then committed.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, stats::RUNNING_STYLE_KEY};

// ─── Raw attribute ───────────────────────────────────────────────────────────

/// A provider value that should be numeric but is not guaranteed to be.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAttribute {
  Int(i64),
  Float(f64),
  Text(String),
  #[default]
  Null,
}

impl RawAttribute {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  /// Null, or text with nothing but whitespace.
  pub fn is_blank(&self) -> bool {
    match self {
      Self::Null => true,
      Self::Text(s) => s.trim().is_empty(),
      _ => false,
    }
  }

  /// Interpret the value as an integer, accepting integral floats and
  /// numeric strings.
  pub fn as_integer(&self, field: &'static str) -> Result<i64> {
    let parsed = match self {
      Self::Int(v) => Some(*v),
      Self::Float(f) => integral(*f),
      Self::Text(s) => {
        let s = s.trim();
        s.parse::<i64>()
          .ok()
          .or_else(|| s.parse::<f64>().ok().and_then(integral))
      }
      Self::Null => None,
    };
    parsed.ok_or_else(|| Error::InvalidAttribute { field, value: self.to_string() })
  }

  /// The value as text, for label-valued entries such as the running style.
  pub fn as_label(&self) -> Option<&str> {
    match self {
      Self::Text(s) if !s.is_empty() => Some(s.as_str()),
      _ => None,
    }
  }
}

fn integral(f: f64) -> Option<i64> {
  (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

impl fmt::Display for RawAttribute {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Int(v) => write!(f, "{v}"),
      Self::Float(v) => write!(f, "{v}"),
      Self::Text(s) => write!(f, "{s:?}"),
      Self::Null => f.write_str("null"),
    }
  }
}

// ─── Nested provider objects ─────────────────────────────────────────────────

/// A provider object identified by a string code (position, archetype,
/// iteration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLabel {
  /// Short code, e.g. `"HB"` for a position or `"12-week-11"` for an
  /// iteration.
  #[serde(default)]
  pub id:    String,
  /// Display label, e.g. `"Halfback"` or `"Receiving Back - HB"`.
  #[serde(default)]
  pub label: String,
}

/// The team a player belongs to, labelled with the provider's short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
  #[serde(default)]
  pub id:    Option<i64>,
  pub label: String,
}

/// A player ability; only the label is used for normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRef {
  pub label: String,
}

/// One entry in the stat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
  #[serde(default)]
  pub value: RawAttribute,
  #[serde(default)]
  pub diff:  Option<f64>,
}

// ─── PlayerSnapshot ──────────────────────────────────────────────────────────

/// One player as described by the primary provider for an iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
  /// Stable external identity.
  pub id:               i64,
  pub first_name:       String,
  pub last_name:        String,
  /// Inches.
  #[serde(default)]
  pub height:           RawAttribute,
  /// Pounds.
  #[serde(default)]
  pub weight:           RawAttribute,
  #[serde(default)]
  pub age:              RawAttribute,
  #[serde(default)]
  pub jersey_num:       RawAttribute,
  #[serde(default)]
  pub years_pro:        RawAttribute,
  /// Binary code; `0` is left-handed.
  #[serde(default)]
  pub handedness:       RawAttribute,
  #[serde(default)]
  pub college:          String,
  #[serde(default)]
  pub player_abilities: Vec<AbilityRef>,
  #[serde(default)]
  pub archetype:        Option<CodeLabel>,
  pub team:             TeamRef,
  pub position:         CodeLabel,
  #[serde(default)]
  pub iteration:        Option<CodeLabel>,
  #[serde(default)]
  pub stats:            BTreeMap<String, StatEntry>,
}

impl PlayerSnapshot {
  /// `"<first> <last>"`, the key for player-specific overrides.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// The running-style label, if the stat map carries one.
  pub fn running_style(&self) -> Option<&str> {
    self
      .stats
      .get(RUNNING_STYLE_KEY)
      .and_then(|entry| entry.value.as_label())
  }

  pub fn ability_labels(&self) -> Vec<String> {
    self.player_abilities.iter().map(|a| a.label.clone()).collect()
  }
}
