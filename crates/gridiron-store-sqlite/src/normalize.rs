//! Dimension normalisation: raw player attributes → dimension ids.
//!
//! Measured dimensions are looked up by their numeric natural key and
//! inserted on first sight. Labelled dimensions must already exist; team and
//! college names go through the remapping tables first.
//!
//! Every function here runs on a connection the caller has already placed in
//! a transaction or savepoint, so rows created for a player that later fails
//! are rolled back with it.

use gridiron_core::{
  Error as CoreError,
  dimension::{Dimension, NONE_LABEL, handedness_label},
  mappings::NameMappings,
  player::NormalizedPlayer,
  snapshot::{CodeLabel, PlayerSnapshot, RawAttribute},
  stats::StatLine,
};
use rusqlite::{Connection, OptionalExtension as _, ToSql};

use crate::{Result, encode::dimension_table};

/// Look up the id of `dimension`'s row whose natural key equals `key`.
pub fn lookup(conn: &Connection, dimension: Dimension, key: &dyn ToSql) -> Result<Option<i64>> {
  let t = dimension_table(dimension);
  let sql = format!("SELECT {} FROM {} WHERE {} = ?1", t.id, t.table, t.key);
  let id = conn
    .prepare_cached(&sql)?
    .query_row([key], |row| row.get(0))
    .optional()?;
  Ok(id)
}

/// Look up a labelled dimension row, failing when it does not exist.
pub fn require_label(conn: &Connection, dimension: Dimension, label: &str) -> Result<i64> {
  lookup(conn, dimension, &label)?
    .ok_or_else(|| CoreError::not_found(dimension, label).into())
}

/// Look up a measured dimension row, inserting it with its display string if
/// absent.
pub fn lookup_or_create(conn: &Connection, dimension: Dimension, value: i64) -> Result<i64> {
  if let Some(id) = lookup(conn, dimension, &value)? {
    return Ok(id);
  }

  let t = dimension_table(dimension);
  let (Some(display_column), Some(shown)) = (t.display, dimension.display_value(value))
  else {
    return Err(CoreError::not_found(dimension, value.to_string()).into());
  };

  let sql = format!(
    "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
    t.table, t.key, display_column
  );
  conn.prepare_cached(&sql)?.execute(rusqlite::params![value, shown])?;
  let id = conn.last_insert_rowid();
  tracing::debug!(%dimension, value, id, shown = %shown, "created dimension row");
  Ok(id)
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Resolves a [`PlayerSnapshot`] against the dimension tables.
pub struct Normalizer<'a> {
  conn:     &'a Connection,
  mappings: &'a NameMappings,
}

impl<'a> Normalizer<'a> {
  pub fn new(conn: &'a Connection, mappings: &'a NameMappings) -> Self {
    Self { conn, mappings }
  }

  pub fn normalize(&self, player: &PlayerSnapshot) -> Result<NormalizedPlayer> {
    let measured = |dimension: Dimension, raw: &RawAttribute, field: &'static str| -> Result<i64> {
      lookup_or_create(self.conn, dimension, raw.as_integer(field)?)
    };

    Ok(NormalizedPlayer {
      player_id:        player.id,
      first_name:       player.first_name.clone(),
      last_name:        player.last_name.clone(),
      height_id:        measured(Dimension::Height, &player.height, "height")?,
      weight_id:        measured(Dimension::Weight, &player.weight, "weight")?,
      age_id:           measured(Dimension::Age, &player.age, "age")?,
      jersey_number_id: measured(Dimension::JerseyNumber, &player.jersey_num, "jersey number")?,
      years_pro_id:     measured(Dimension::YearsPro, &player.years_pro, "years pro")?,
      handedness_id:    self.handedness_id(player.handedness.as_integer("handedness")?)?,
      position_id:      self.position_id(&player.position)?,
      team_id:          self.team_id(&player.team.label)?,
      college_id:       self.college_id(&player.college, &player.full_name())?,
      archetype_id:     self.archetype_id(player.archetype.as_ref())?,
      abilities:        player.ability_labels(),
      running_style:    player.running_style().map(str::to_owned),
      stats:            StatLine::from_stats(&player.stats)?,
    })
  }

  pub fn handedness_id(&self, code: i64) -> Result<i64> {
    require_label(self.conn, Dimension::Handedness, handedness_label(code))
  }

  /// Positions resolve by short code (`"HB"`), not by display label.
  pub fn position_id(&self, position: &CodeLabel) -> Result<i64> {
    require_label(self.conn, Dimension::Position, &position.id)
  }

  pub fn team_id(&self, short_name: &str) -> Result<i64> {
    let label = self.mappings.team_label(short_name);
    lookup(self.conn, Dimension::Team, &label)?.ok_or_else(|| {
      CoreError::DimensionNotFound {
        dimension: Dimension::Team,
        key:       short_name.to_owned(),
        mapped:    Some(label.to_owned()),
      }
      .into()
    })
  }

  /// Player override first, then the raw name, then the alias table.
  pub fn college_id(&self, raw: &str, player_name: &str) -> Result<i64> {
    if let Some(name) = self.mappings.college_override(player_name) {
      if let Some(id) = lookup(self.conn, Dimension::College, &name)? {
        return Ok(id);
      }
      tracing::warn!(player_name, college = name, "college override not in college table");
    }

    if let Some(id) = lookup(self.conn, Dimension::College, &raw)? {
      return Ok(id);
    }

    let alias = self.mappings.college_alias(raw);
    if let Some(name) = alias {
      if let Some(id) = lookup(self.conn, Dimension::College, &name)? {
        return Ok(id);
      }
    }

    Err(
      CoreError::DimensionNotFound {
        dimension: Dimension::College,
        key:       raw.to_owned(),
        mapped:    alias.map(str::to_owned),
      }
      .into(),
    )
  }

  pub fn archetype_id(&self, archetype: Option<&CodeLabel>) -> Result<i64> {
    let label = archetype
      .map(|a| a.label.as_str())
      .filter(|label| !label.is_empty())
      .unwrap_or(NONE_LABEL);
    require_label(self.conn, Dimension::Archetype, label)
  }
}
