//! [`SqliteStore`], the SQLite implementation of [`RatingStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};

use gridiron_core::{
  Error as CoreError,
  dimension::Dimension,
  iteration::{Iteration, NewIteration},
  mappings::NameMappings,
  player::{NormalizedPlayer, PlayerProfile, PlayerRecord, RatingRecord},
  reconcile::{DraftAssignment, TraitAssignment},
  snapshot::PlayerSnapshot,
  store::{DraftWriteSummary, IngestSummary, RatingStore},
};

use crate::{
  Error, Result,
  commit::commit_player,
  encode::{ITERATION_COLUMNS, RawIteration, RawRating, SELECT_RATING, dimension_table, encode_dt},
  normalize::{Normalizer, lookup, lookup_or_create},
  pool::{Pool, PoolOptions},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Gridiron rating store backed by a pool of SQLite connections.
///
/// Cloning is cheap: the pool and mapping tables are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pool:     Pool,
  mappings: Arc<NameMappings>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, options: PoolOptions) -> Result<Self> {
    let pool = Pool::open(path, options).await?;
    Self::from_pool(pool).await
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let pool = Pool::open_in_memory(PoolOptions::default()).await?;
    Self::from_pool(pool).await
  }

  async fn from_pool(pool: Pool) -> Result<Self> {
    let store = Self { pool, mappings: Arc::new(NameMappings::builtin()) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Replace the team/college remapping tables used during normalisation.
  pub fn with_mappings(mut self, mappings: NameMappings) -> Self {
    self.mappings = Arc::new(mappings);
    self
  }

  pub fn pool(&self) -> &Pool { &self.pool }

  /// Close every pooled connection. Later calls fail with
  /// [`Error::PoolClosed`].
  pub async fn close(&self) -> Result<()> { self.pool.close().await }

  /// Ensure a dimension row exists for `label` and return its id.
  ///
  /// This is the seeding surface for reference data (teams, colleges,
  /// positions, abilities, archetypes). Measured dimensions take the numeric
  /// value as their label.
  pub async fn register_label(&self, dimension: Dimension, label: &str) -> Result<i64> {
    let label = label.to_owned();
    self
      .with_conn(move |conn| {
        if dimension.is_measured() {
          let value = label.trim().parse::<i64>().map_err(|_| {
            CoreError::InvalidAttribute { field: "label", value: label.clone() }
          })?;
          return lookup_or_create(conn, dimension, value);
        }

        let t = dimension_table(dimension);
        conn.execute(
          &format!("INSERT OR IGNORE INTO {} ({}) VALUES (?1)", t.table, t.key),
          [&label],
        )?;
        lookup(conn, dimension, &label)?
          .ok_or_else(|| CoreError::not_found(dimension, label).into())
      })
      .await
  }

  /// Run `f` on a pooled connection's thread.
  async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let conn = self.pool.get().await?;
    conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── Transactional helpers ───────────────────────────────────────────────────

fn begin(conn: &mut Connection) -> Result<rusqlite::Transaction<'_>> {
  Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

fn insert_iteration(conn: &Connection, input: &NewIteration) -> Result<Iteration> {
  let exists = conn
    .query_row(
      "SELECT 1 FROM rating_iteration WHERE iteration_name = ?1",
      [&input.name],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  if exists {
    return Err(Error::DuplicateIteration(input.name.clone()));
  }

  let date = Utc::now();
  conn.execute(
    "INSERT INTO rating_iteration
       (iteration_name, iteration_date, season_year, week_number, is_regular_season)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      input.name,
      encode_dt(date),
      input.season_year,
      input.week_number,
      input.is_regular_season,
    ],
  )?;

  Ok(Iteration {
    iteration_id:      conn.last_insert_rowid(),
    name:              input.name.clone(),
    date,
    season_year:       input.season_year,
    week_number:       input.week_number,
    is_regular_season: input.is_regular_season,
  })
}

/// Normalise and commit one player inside a savepoint of the run transaction.
fn ingest_player(
  tx: &mut rusqlite::Transaction<'_>,
  mappings: &NameMappings,
  player: &PlayerSnapshot,
  iteration_id: i64,
) -> Result<()> {
  let sp = tx.savepoint()?;
  let normalized = Normalizer::new(&sp, mappings).normalize(player)?;
  commit_player(&sp, &normalized, iteration_id)?;
  sp.commit()?;
  Ok(())
}

fn query_iteration(
  conn: &Connection,
  clause: &str,
  params: impl rusqlite::Params,
) -> Result<Option<Iteration>> {
  let raw = conn
    .query_row(
      &format!("SELECT {ITERATION_COLUMNS} FROM rating_iteration {clause}"),
      params,
      RawIteration::from_row,
    )
    .optional()?;
  raw.map(RawIteration::into_iteration).transpose()
}

// ─── RatingStore impl ────────────────────────────────────────────────────────

impl RatingStore for SqliteStore {
  type Error = Error;

  // ── Iterations ────────────────────────────────────────────────────────────

  async fn latest_iteration(&self) -> Result<Option<Iteration>> {
    self
      .with_conn(|conn| {
        query_iteration(conn, "ORDER BY iteration_date DESC, iteration_id DESC LIMIT 1", [])
      })
      .await
  }

  async fn iteration_by_name(&self, name: &str) -> Result<Option<Iteration>> {
    let name = name.to_owned();
    self
      .with_conn(move |conn| query_iteration(conn, "WHERE iteration_name = ?1", [name]))
      .await
  }

  async fn list_iterations(&self) -> Result<Vec<Iteration>> {
    let raws: Vec<RawIteration> = self
      .with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ITERATION_COLUMNS} FROM rating_iteration
           ORDER BY iteration_date, iteration_id"
        ))?;
        let rows = stmt
          .query_map([], RawIteration::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIteration::into_iteration).collect()
  }

  async fn create_iteration(&self, input: NewIteration) -> Result<Iteration> {
    self
      .with_conn(move |conn| {
        let tx = begin(conn)?;
        let iteration = insert_iteration(&tx, &input)?;
        tx.commit()?;
        Ok(iteration)
      })
      .await
  }

  // ── Ingestion ─────────────────────────────────────────────────────────────

  async fn normalize(&self, player: &PlayerSnapshot) -> Result<NormalizedPlayer> {
    let player = player.clone();
    let mappings = Arc::clone(&self.mappings);
    self
      .with_conn(move |conn| {
        let tx = begin(conn)?;
        let normalized = Normalizer::new(&tx, &mappings).normalize(&player)?;
        tx.commit()?;
        Ok(normalized)
      })
      .await
  }

  async fn commit(&self, player: NormalizedPlayer, iteration_id: i64) -> Result<()> {
    self
      .with_conn(move |conn| {
        let tx = begin(conn)?;
        commit_player(&tx, &player, iteration_id)?;
        tx.commit()?;
        Ok(())
      })
      .await
  }

  async fn ingest(
    &self,
    iteration: NewIteration,
    players: Vec<PlayerSnapshot>,
  ) -> Result<IngestSummary> {
    let mappings = Arc::clone(&self.mappings);
    let summary = self
      .with_conn(move |conn| {
        let mut tx = begin(conn)?;
        let iteration = insert_iteration(&tx, &iteration)?;

        for player in &players {
          ingest_player(&mut tx, &mappings, player, iteration.iteration_id).inspect_err(
            |e| {
              tracing::error!(
                player_id = player.id,
                player = %player.full_name(),
                error = %e,
                "player failed; rolling back run"
              )
            },
          )?;
        }

        tx.commit()?;
        Ok(IngestSummary { iteration, players: players.len() })
      })
      .await?;

    tracing::info!(
      iteration = %summary.iteration.name,
      iteration_id = summary.iteration.iteration_id,
      players = summary.players,
      "iteration ingested"
    );
    Ok(summary)
  }

  // ── Reconciliation ────────────────────────────────────────────────────────

  async fn apply_development_traits(
    &self,
    iteration_id: i64,
    assignments: Vec<TraitAssignment>,
  ) -> Result<usize> {
    self
      .with_conn(move |conn| {
        let tx = begin(conn)?;
        let mut updated = 0;
        {
          let mut stmt = tx.prepare_cached(
            "UPDATE player_rating SET development_trait_id = ?1
             WHERE player_id = ?2 AND iteration_id = ?3",
          )?;
          for a in &assignments {
            updated += stmt.execute(rusqlite::params![
              a.development_trait_id,
              a.player_id,
              iteration_id
            ])?;
          }
        }
        tx.commit()?;
        Ok(updated)
      })
      .await
  }

  async fn assign_draft_picks(
    &self,
    assignments: Vec<DraftAssignment>,
  ) -> Result<DraftWriteSummary> {
    self
      .with_conn(move |conn| {
        let tx = begin(conn)?;
        let mut summary = DraftWriteSummary::default();
        {
          let mut existing =
            tx.prepare_cached("SELECT 1 FROM draft_data WHERE player_id = ?1")?;
          let mut insert = tx.prepare_cached(
            "INSERT INTO draft_data (player_id, pick_id)
             VALUES (?1, (SELECT pick_id FROM draft_pick WHERE overall_pick = ?2))",
          )?;
          for a in &assignments {
            if existing.exists([a.player_id])? {
              tracing::debug!(player_id = a.player_id, "draft pick already assigned");
              summary.already_assigned += 1;
              continue;
            }
            insert.execute([a.player_id, a.overall_pick])?;
            summary.inserted += 1;
          }
        }
        tx.commit()?;
        Ok(summary)
      })
      .await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Measured dimensions take the numeric value as `key`; a non-numeric key
  /// matches nothing.
  async fn lookup(&self, dimension: Dimension, key: &str) -> Result<Option<i64>> {
    let key = key.to_owned();
    self
      .with_conn(move |conn| {
        if dimension.is_measured() {
          match key.trim().parse::<i64>() {
            Ok(value) => lookup(conn, dimension, &value),
            Err(_) => Ok(None),
          }
        } else {
          lookup(conn, dimension, &key)
        }
      })
      .await
  }

  async fn get_player(&self, player_id: i64) -> Result<Option<PlayerRecord>> {
    self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT player_id, first_name, last_name, height_id, weight_id, age_id,
                      college_id, handedness_id, jersey_number_id, years_pro_id,
                      position_id, team_id
               FROM player WHERE player_id = ?1",
              [player_id],
              |row| {
                Ok(PlayerRecord {
                  player_id:        row.get(0)?,
                  first_name:       row.get(1)?,
                  last_name:        row.get(2)?,
                  height_id:        row.get(3)?,
                  weight_id:        row.get(4)?,
                  age_id:           row.get(5)?,
                  college_id:       row.get(6)?,
                  handedness_id:    row.get(7)?,
                  jersey_number_id: row.get(8)?,
                  years_pro_id:     row.get(9)?,
                  position_id:      row.get(10)?,
                  team_id:          row.get(11)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
  }

  async fn player_profile(&self, player_id: i64) -> Result<Option<PlayerProfile>> {
    self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT p.player_id, p.first_name, p.last_name,
                      h.display_height, w.display_weight, a.display_age,
                      j.display_number, y.display_years, hd.handedness,
                      pos.position, t.team_label, c.college_name
               FROM player p
               JOIN player_height h  ON h.height_id          = p.height_id
               JOIN player_weight w  ON w.weight_id          = p.weight_id
               JOIN player_age a     ON a.age_id             = p.age_id
               JOIN jersey_number j  ON j.jersey_number_id   = p.jersey_number_id
               JOIN years_pro y      ON y.years_pro_id       = p.years_pro_id
               JOIN handedness hd    ON hd.handedness_id     = p.handedness_id
               JOIN position pos     ON pos.position_id      = p.position_id
               JOIN team t           ON t.team_id            = p.team_id
               LEFT JOIN college c   ON c.college_id         = p.college_id
               WHERE p.player_id = ?1",
              [player_id],
              |row| {
                Ok(PlayerProfile {
                  player_id:     row.get(0)?,
                  first_name:    row.get(1)?,
                  last_name:     row.get(2)?,
                  height:        row.get(3)?,
                  weight:        row.get(4)?,
                  age:           row.get(5)?,
                  jersey_number: row.get(6)?,
                  years_pro:     row.get(7)?,
                  handedness:    row.get(8)?,
                  position:      row.get(9)?,
                  team:          row.get(10)?,
                  college:       row.get(11)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
  }

  async fn get_rating(&self, player_id: i64, iteration_id: i64) -> Result<Option<RatingRecord>> {
    let raw: Option<RawRating> = self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(&SELECT_RATING, [player_id, iteration_id], RawRating::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRating::into_rating).transpose()
  }

  async fn player_abilities(&self, player_id: i64, iteration_id: i64) -> Result<Vec<i64>> {
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT ability_id FROM player_ability
           WHERE player_id = ?1 AND iteration_id = ?2
           ORDER BY ability_id",
        )?;
        let ids = stmt
          .query_map([player_id, iteration_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
      })
      .await
  }

  async fn player_archetype(&self, player_id: i64, iteration_id: i64) -> Result<Option<i64>> {
    self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT archetype_id FROM player_archetype
               WHERE player_id = ?1 AND iteration_id = ?2",
              [player_id, iteration_id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
  }

  async fn draft_pick(&self, player_id: i64) -> Result<Option<i64>> {
    self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT dp.overall_pick
               FROM draft_data d
               JOIN draft_pick dp ON dp.pick_id = d.pick_id
               WHERE d.player_id = ?1",
              [player_id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
  }
}
