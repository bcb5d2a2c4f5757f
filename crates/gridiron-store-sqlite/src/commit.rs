//! Rating commit: write one normalised player for an iteration.
//!
//! [`commit_player`] expects to run inside a transaction or savepoint owned
//! by the caller; any error leaves it to the caller to roll back.

use std::sync::LazyLock;

use gridiron_core::{
  Error as CoreError,
  dimension::{Dimension, NONE_LABEL},
  player::NormalizedPlayer,
  reconcile::DEFAULT_DEVELOPMENT_TRAIT_ID,
  stats::STAT_COLUMNS,
};
use rusqlite::Connection;

use crate::{Result, normalize::lookup};

const UPSERT_PLAYER: &str = "
  INSERT INTO player (
    player_id, first_name, last_name, height_id, weight_id, age_id, college_id,
    handedness_id, jersey_number_id, years_pro_id, position_id, team_id
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
  ON CONFLICT(player_id) DO UPDATE SET
    first_name       = excluded.first_name,
    last_name        = excluded.last_name,
    height_id        = excluded.height_id,
    weight_id        = excluded.weight_id,
    age_id           = excluded.age_id,
    college_id       = excluded.college_id,
    handedness_id    = excluded.handedness_id,
    jersey_number_id = excluded.jersey_number_id,
    years_pro_id     = excluded.years_pro_id,
    position_id      = excluded.position_id,
    team_id          = excluded.team_id
";

/// `INSERT INTO player_rating` over the key columns plus every catalogue stat.
static INSERT_RATING: LazyLock<String> = LazyLock::new(|| {
  let columns = STAT_COLUMNS
    .iter()
    .map(|(_, column)| *column)
    .collect::<Vec<_>>()
    .join(", ");
  let placeholders = (1..=STAT_COLUMNS.len() + 4)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO player_rating \
     (player_id, iteration_id, development_trait_id, style_id, {columns}) \
     VALUES ({placeholders})"
  )
});

pub fn commit_player(conn: &Connection, player: &NormalizedPlayer, iteration_id: i64) -> Result<()> {
  let style_id = style_id(conn, player.running_style.as_deref())?;

  conn.prepare_cached(UPSERT_PLAYER)?.execute(rusqlite::params![
    player.player_id,
    player.first_name,
    player.last_name,
    player.height_id,
    player.weight_id,
    player.age_id,
    player.college_id,
    player.handedness_id,
    player.jersey_number_id,
    player.years_pro_id,
    player.position_id,
    player.team_id,
  ])?;

  let mut values = Vec::with_capacity(STAT_COLUMNS.len() + 4);
  values.extend([player.player_id, iteration_id, DEFAULT_DEVELOPMENT_TRAIT_ID, style_id]);
  values.extend_from_slice(player.stats.values());
  conn
    .prepare_cached(&INSERT_RATING)?
    .execute(rusqlite::params_from_iter(values))?;

  let mut insert_ability = conn.prepare_cached(
    "INSERT OR IGNORE INTO player_ability (player_id, ability_id, iteration_id)
     VALUES (?1, ?2, ?3)",
  )?;
  for label in &player.abilities {
    match lookup(conn, Dimension::Ability, label)? {
      Some(ability_id) => {
        insert_ability.execute(rusqlite::params![player.player_id, ability_id, iteration_id])?;
      }
      None => tracing::warn!(
        player_id = player.player_id,
        ability = %label,
        "unknown ability; skipped"
      ),
    }
  }

  conn
    .prepare_cached(
      "INSERT INTO player_archetype (player_id, archetype_id, iteration_id)
       VALUES (?1, ?2, ?3)",
    )?
    .execute(rusqlite::params![player.player_id, player.archetype_id, iteration_id])?;

  Ok(())
}

/// The running style's id, or the `None` style's when the label is absent or
/// unknown.
fn style_id(conn: &Connection, label: Option<&str>) -> Result<i64> {
  if let Some(label) = label {
    if let Some(id) = lookup(conn, Dimension::RunningStyle, &label)? {
      return Ok(id);
    }
    tracing::debug!(style = label, "unknown running style; using None");
  }
  lookup(conn, Dimension::RunningStyle, &NONE_LABEL)?
    .ok_or_else(|| CoreError::not_found(Dimension::RunningStyle, NONE_LABEL).into())
}
