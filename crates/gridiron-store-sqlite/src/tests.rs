//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use gridiron_core::{
  Error as CoreError,
  dimension::Dimension,
  iteration::NewIteration,
  reconcile::{DraftAssignment, LAST_PICK, TraitAssignment},
  snapshot::PlayerSnapshot,
  stats::STAT_COLUMNS,
  store::RatingStore,
};
use serde_json::json;
use strum::IntoEnumIterator as _;

use crate::{Error, Pool, PoolOptions, SqliteStore, encode::dimension_table};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// A store with the reference data the fixture players need.
async fn seeded() -> SqliteStore {
  let s = store().await;
  for (dimension, label) in [
    (Dimension::Team, "Kansas City Chiefs"),
    (Dimension::College, "Texas A&M"),
    (Dimension::College, "Albany State"),
    (Dimension::Position, "QB"),
    (Dimension::Position, "HB"),
    (Dimension::Archetype, "Field General - QB"),
    (Dimension::Ability, "Bazooka"),
  ] {
    s.register_label(dimension, label).await.unwrap();
  }
  s
}

fn player(id: i64, first: &str, last: &str) -> serde_json::Value {
  json!({
    "id": id,
    "firstName": first,
    "lastName": last,
    "height": 73,
    "weight": 215,
    "age": 24,
    "jerseyNum": 15,
    "yearsPro": 0,
    "handedness": 1,
    "college": "Texas AM",
    "playerAbilities": [{ "label": "Bazooka" }, { "label": "Not An Ability" }],
    "archetype": { "id": "QB_FieldGeneral", "label": "Field General - QB" },
    "team": { "label": "KC Chiefs" },
    "position": { "id": "QB", "label": "Quarterback" },
    "stats": {
      "overall": { "value": 90 },
      "throwPower": { "value": "95" },
      "runningStyle": { "value": "Default" }
    }
  })
}

fn snapshot(value: serde_json::Value) -> PlayerSnapshot {
  serde_json::from_value(value).unwrap()
}

fn week(name: &str) -> NewIteration { NewIteration::parse(name).unwrap() }

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_seeds_fixed_enumerations() {
  let s = store().await;

  assert!(s.lookup(Dimension::Handedness, "Left").await.unwrap().is_some());
  assert!(s.lookup(Dimension::Handedness, "Right").await.unwrap().is_some());
  assert_eq!(s.lookup(Dimension::DevelopmentTrait, "Normal").await.unwrap(), Some(1));
  assert_eq!(s.lookup(Dimension::DevelopmentTrait, "X-Factor").await.unwrap(), Some(4));
  assert!(s.lookup(Dimension::RunningStyle, "None").await.unwrap().is_some());
  assert!(s.lookup(Dimension::Archetype, "None").await.unwrap().is_some());

  let (count, last): (i64, String) = s
    .pool()
    .get()
    .await
    .unwrap()
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*), MAX(display_pick) FILTER (WHERE overall_pick = 1728)
         FROM draft_pick",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(count, LAST_PICK);
  assert_eq!(last, "Round 54, Pick 32 (1728 overall)");
}

#[tokio::test]
async fn rating_columns_match_stat_catalogue() {
  let s = store().await;
  let columns: Vec<String> = s
    .pool()
    .get()
    .await
    .unwrap()
    .call(|conn| {
      let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('player_rating')")?;
      let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(names)
    })
    .await
    .unwrap();

  let expected: Vec<String> = ["player_id", "iteration_id", "development_trait_id", "style_id"]
    .into_iter()
    .chain(STAT_COLUMNS.iter().map(|(_, column)| *column))
    .map(str::to_owned)
    .collect();
  assert_eq!(columns, expected);
}

#[tokio::test]
async fn every_dimension_maps_to_a_table() {
  let s = store().await;
  for dimension in Dimension::iter() {
    // Fails with a SQL error if the table or key column is missing.
    let key = if dimension.is_measured() { "1" } else { "no such label" };
    s.lookup(dimension, key)
      .await
      .unwrap_or_else(|e| panic!("{dimension}: {e}"));
    assert_eq!(dimension_table(dimension).display.is_some(), dimension.is_measured());
  }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn measured_dimensions_are_created_once() {
  let s = seeded().await;

  let a = s.normalize(&snapshot(player(1, "Pat", "Example"))).await.unwrap();
  let b = s.normalize(&snapshot(player(2, "Sam", "Sample"))).await.unwrap();

  assert_eq!(a.height_id, b.height_id);
  assert_eq!(a.weight_id, b.weight_id);
  assert_eq!(s.lookup(Dimension::Height, "73").await.unwrap(), Some(a.height_id));
  assert_eq!(s.lookup(Dimension::Height, "tall").await.unwrap(), None);
}

#[tokio::test]
async fn remaps_team_and_college() {
  let s = seeded().await;
  let n = s.normalize(&snapshot(player(1, "Pat", "Example"))).await.unwrap();

  assert_eq!(
    Some(n.team_id),
    s.lookup(Dimension::Team, "Kansas City Chiefs").await.unwrap()
  );
  assert_eq!(Some(n.college_id), s.lookup(Dimension::College, "Texas A&M").await.unwrap());
}

#[tokio::test]
async fn college_override_wins_over_raw_and_alias() {
  let s = seeded().await;
  // "Texas AM" would alias to Texas A&M; the player override takes priority.
  let n = s.normalize(&snapshot(player(1, "Grover", "Stewart"))).await.unwrap();
  assert_eq!(
    Some(n.college_id),
    s.lookup(Dimension::College, "Albany State").await.unwrap()
  );
}

#[tokio::test]
async fn raw_college_name_wins_over_alias() {
  let s = seeded().await;
  let raw = s.register_label(Dimension::College, "Texas AM").await.unwrap();
  let n = s.normalize(&snapshot(player(1, "Pat", "Example"))).await.unwrap();
  assert_eq!(n.college_id, raw);
}

#[tokio::test]
async fn unknown_college_reports_attempted_mapping() {
  let s = store().await;
  s.register_label(Dimension::Team, "Kansas City Chiefs").await.unwrap();
  s.register_label(Dimension::Position, "QB").await.unwrap();

  let err = s
    .normalize(&snapshot(player(1, "Pat", "Example")))
    .await
    .unwrap_err();
  match err {
    Error::Core(CoreError::DimensionNotFound { dimension, key, mapped }) => {
      assert_eq!(dimension, Dimension::College);
      assert_eq!(key, "Texas AM");
      assert_eq!(mapped.as_deref(), Some("Texas A&M"));
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn unresolved_position_fails() {
  let s = seeded().await;
  let mut value = player(1, "Pat", "Example");
  value["position"] = json!({ "id": "LS", "label": "Long Snapper" });

  let err = s.normalize(&snapshot(value)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::DimensionNotFound { dimension: Dimension::Position, .. })
  ));
}

#[tokio::test]
async fn missing_archetype_resolves_to_none() {
  let s = seeded().await;
  let mut value = player(1, "Pat", "Example");
  value["archetype"] = json!(null);

  let n = s.normalize(&snapshot(value)).await.unwrap();
  assert_eq!(Some(n.archetype_id), s.lookup(Dimension::Archetype, "None").await.unwrap());
}

#[tokio::test]
async fn non_numeric_height_is_rejected() {
  let s = seeded().await;
  let mut value = player(1, "Pat", "Example");
  value["height"] = json!("six foot");

  let err = s.normalize(&snapshot(value)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::InvalidAttribute { field: "height", .. })
  ));
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn ingest_writes_player_rating_and_assignments() {
  let s = seeded().await;
  let summary = s
    .ingest(week("12-week-12"), vec![snapshot(player(7, "Pat", "Example"))])
    .await
    .unwrap();
  assert_eq!(summary.players, 1);
  let iteration = summary.iteration;
  assert_eq!((iteration.season_year, iteration.week_number), (12, 12));

  let profile = s.player_profile(7).await.unwrap().unwrap();
  assert_eq!(profile.team, "Kansas City Chiefs");
  assert_eq!(profile.college.as_deref(), Some("Texas A&M"));
  assert_eq!(profile.height, "6'1\"");
  assert_eq!(profile.weight, "215 lbs");
  assert_eq!(profile.jersey_number, "15");
  assert_eq!(profile.years_pro, "Rookie");
  assert_eq!(profile.handedness, "Right");

  let rating = s.get_rating(7, iteration.iteration_id).await.unwrap().unwrap();
  assert_eq!(rating.development_trait_id, 1);
  assert_eq!(rating.stats.get("overall"), Some(90));
  assert_eq!(rating.stats.get("throw_power"), Some(95));
  assert_eq!(rating.stats.get("speed"), Some(0));
  assert_eq!(
    Some(rating.style_id),
    s.lookup(Dimension::RunningStyle, "Default").await.unwrap()
  );

  // The unknown ability is skipped.
  let bazooka = s.lookup(Dimension::Ability, "Bazooka").await.unwrap().unwrap();
  assert_eq!(s.player_abilities(7, iteration.iteration_id).await.unwrap(), vec![bazooka]);
  assert_eq!(
    s.player_archetype(7, iteration.iteration_id).await.unwrap(),
    s.lookup(Dimension::Archetype, "Field General - QB").await.unwrap()
  );
}

#[tokio::test]
async fn unknown_running_style_falls_back_to_none() {
  let s = seeded().await;
  let mut value = player(7, "Pat", "Example");
  value["stats"]["runningStyle"] = json!({ "value": "Moonwalk" });

  let summary = s.ingest(week("12-week-1"), vec![snapshot(value)]).await.unwrap();
  let rating = s.get_rating(7, summary.iteration.iteration_id).await.unwrap().unwrap();
  assert_eq!(
    Some(rating.style_id),
    s.lookup(Dimension::RunningStyle, "None").await.unwrap()
  );
}

#[tokio::test]
async fn player_record_is_last_write_wins() {
  let s = seeded().await;
  s.ingest(week("12-week-1"), vec![snapshot(player(7, "Pat", "Example"))])
    .await
    .unwrap();

  let mut value = player(7, "Pat", "Example");
  value["weight"] = json!(230);
  s.ingest(week("12-week-2"), vec![snapshot(value)]).await.unwrap();

  let profile = s.player_profile(7).await.unwrap().unwrap();
  assert_eq!(profile.weight, "230 lbs");
  assert_eq!(s.list_iterations().await.unwrap().len(), 2);
}

#[tokio::test]
async fn failing_player_rolls_back_the_whole_run() {
  let s = seeded().await;
  let mut bad = player(8, "Sam", "Sample");
  bad["height"] = json!(80);
  bad["college"] = json!("Nowhere Tech");

  let err = s
    .ingest(week("12-week-12"), vec![snapshot(player(7, "Pat", "Example")), snapshot(bad)])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DimensionNotFound { .. })));

  assert!(s.list_iterations().await.unwrap().is_empty());
  assert!(s.get_player(7).await.unwrap().is_none());
  // Dimension rows created during the run are rolled back as well.
  assert_eq!(s.lookup(Dimension::Height, "73").await.unwrap(), None);
  assert_eq!(s.lookup(Dimension::Height, "80").await.unwrap(), None);
}

#[tokio::test]
async fn iteration_name_is_ingested_once() {
  let s = seeded().await;
  s.ingest(week("12-week-12"), vec![snapshot(player(7, "Pat", "Example"))])
    .await
    .unwrap();

  let err = s
    .ingest(week("12-week-12"), vec![snapshot(player(7, "Pat", "Example"))])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateIteration(ref name) if name == "12-week-12"));
  assert_eq!(s.list_iterations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn commit_is_all_or_nothing() {
  let s = seeded().await;
  let iteration = s.create_iteration(week("12-week-12")).await.unwrap();
  let mut normalized = s.normalize(&snapshot(player(7, "Pat", "Example"))).await.unwrap();
  // Fails the last step: the archetype foreign key.
  normalized.archetype_id = 9_999;

  assert!(s.commit(normalized, iteration.iteration_id).await.is_err());
  assert!(s.get_player(7).await.unwrap().is_none());
  assert!(s.get_rating(7, iteration.iteration_id).await.unwrap().is_none());
  assert!(s.player_abilities(7, iteration.iteration_id).await.unwrap().is_empty());
}

// ─── Iterations ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_iteration_is_most_recent() {
  let s = store().await;
  assert!(s.latest_iteration().await.unwrap().is_none());

  s.create_iteration(week("12-week-11")).await.unwrap();
  let second = s.create_iteration(week("12-week-12")).await.unwrap();

  let latest = s.latest_iteration().await.unwrap().unwrap();
  assert_eq!(latest.iteration_id, second.iteration_id);
  assert_eq!(latest.name, "12-week-12");

  let by_name = s.iteration_by_name("12-week-11").await.unwrap().unwrap();
  assert!(by_name.iteration_id < second.iteration_id);
  assert!(s.iteration_by_name("12-week-13").await.unwrap().is_none());
}

// ─── Reconciliation writes ───────────────────────────────────────────────────

#[tokio::test]
async fn development_traits_update_existing_rows_only() {
  let s = seeded().await;
  let summary = s
    .ingest(week("12-week-12"), vec![snapshot(player(7, "Pat", "Example"))])
    .await
    .unwrap();
  let iteration_id = summary.iteration.iteration_id;

  let updated = s
    .apply_development_traits(iteration_id, vec![
      TraitAssignment { player_id: 7, development_trait_id: 3 },
      TraitAssignment { player_id: 999, development_trait_id: 2 },
    ])
    .await
    .unwrap();
  assert_eq!(updated, 1);

  let rating = s.get_rating(7, iteration_id).await.unwrap().unwrap();
  assert_eq!(rating.development_trait_id, 3);
  assert_eq!(rating.stats.get("overall"), Some(90));
}

#[tokio::test]
async fn draft_picks_are_write_once() {
  let s = seeded().await;
  s.ingest(week("12-week-12"), vec![
    snapshot(player(7, "Pat", "Example")),
    snapshot(player(8, "Sam", "Sample")),
  ])
  .await
  .unwrap();

  let first = s
    .assign_draft_picks(vec![
      DraftAssignment { player_id: 7, overall_pick: 12 },
      DraftAssignment { player_id: 8, overall_pick: LAST_PICK },
    ])
    .await
    .unwrap();
  assert_eq!((first.inserted, first.already_assigned), (2, 0));

  let second = s
    .assign_draft_picks(vec![DraftAssignment { player_id: 7, overall_pick: 1 }])
    .await
    .unwrap();
  assert_eq!((second.inserted, second.already_assigned), (0, 1));

  assert_eq!(s.draft_pick(7).await.unwrap(), Some(12));
  assert_eq!(s.draft_pick(8).await.unwrap(), Some(LAST_PICK));
  assert_eq!(s.draft_pick(9).await.unwrap(), None);
}

#[tokio::test]
async fn draft_pass_rolls_back_on_unknown_pick() {
  let s = seeded().await;
  s.ingest(week("12-week-12"), vec![
    snapshot(player(7, "Pat", "Example")),
    snapshot(player(8, "Sam", "Sample")),
  ])
  .await
  .unwrap();

  // Pick 0 has no draft_pick row, so the whole pass fails.
  let result = s
    .assign_draft_picks(vec![
      DraftAssignment { player_id: 7, overall_pick: 12 },
      DraftAssignment { player_id: 8, overall_pick: 0 },
    ])
    .await;
  assert!(result.is_err());
  assert_eq!(s.draft_pick(7).await.unwrap(), None);
  assert_eq!(s.draft_pick(8).await.unwrap(), None);
}

// ─── Pool ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pool_times_out_when_exhausted() {
  let pool = Pool::open_in_memory(PoolOptions {
    acquire_timeout: Duration::from_millis(50),
    ..PoolOptions::default()
  })
  .await
  .unwrap();

  let held = pool.get().await.unwrap();
  assert_eq!(pool.available(), 0);
  let Err(err) = pool.get().await else { panic!("pool handed out a second connection") };
  assert!(matches!(err, Error::PoolTimeout(_)));

  drop(held);
  assert_eq!(pool.available(), 1);
  assert!(pool.get().await.is_ok());
}

#[tokio::test]
async fn pooled_connections_carry_busy_timeout() {
  let pool = Pool::open_in_memory(PoolOptions {
    busy_timeout: Duration::from_millis(1234),
    ..PoolOptions::default()
  })
  .await
  .unwrap();

  let conn = pool.get().await.unwrap();
  let ms: i64 = conn
    .call(|c| Ok(c.query_row("PRAGMA busy_timeout", [], |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(ms, 1234);
}

#[tokio::test]
async fn closed_store_refuses_work() {
  let s = store().await;
  s.close().await.unwrap();
  let err = s.latest_iteration().await.unwrap_err();
  assert!(matches!(err, Error::PoolClosed));
}

#[tokio::test]
async fn file_store_shares_state_across_connections() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("ratings.db");
  let options = PoolOptions { max_connections: 3, ..PoolOptions::default() };

  let s = SqliteStore::open(&path, options).await.unwrap();
  let id = s.register_label(Dimension::Team, "Kansas City Chiefs").await.unwrap();

  let (a, b, c) = tokio::join!(
    s.lookup(Dimension::Team, "Kansas City Chiefs"),
    s.lookup(Dimension::Team, "Kansas City Chiefs"),
    s.lookup(Dimension::Team, "Kansas City Chiefs"),
  );
  for found in [a, b, c] {
    assert_eq!(found.unwrap(), Some(id));
  }
  s.close().await.unwrap();

  // Schema initialisation is idempotent on reopen.
  let reopened = SqliteStore::open(&path, options).await.unwrap();
  assert_eq!(
    reopened.lookup(Dimension::Team, "Kansas City Chiefs").await.unwrap(),
    Some(id)
  );
}
