//! Provider fetchers against a mock HTTP server.

use std::path::Path;

use httpmock::prelude::*;
use serde_json::json;

use crate::{
  Error, IterationResolver, PrimaryOptions, SecondaryFetcher, SecondaryOptions, SnapshotFetcher,
  cache::latest_cached_iteration, client::http_client,
};

fn client() -> reqwest::Client { http_client(std::time::Duration::from_secs(5)).unwrap() }

fn primary_options(server: &MockServer, cache_dir: &Path) -> PrimaryOptions {
  PrimaryOptions {
    base_url: server.url("/rating/madden-nfl"),
    ratings_page_url: server.url("/ratings"),
    page_size: 2,
    page_delay_ms: 0,
    cache_dir: cache_dir.to_path_buf(),
    ..PrimaryOptions::default()
  }
}

fn item(id: i64) -> serde_json::Value {
  json!({
    "id": id,
    "firstName": "Player",
    "lastName": format!("{id}"),
    "height": 72,
    "weight": 200,
    "age": 25,
    "team": { "label": "KC Chiefs" },
    "position": { "id": "WR", "label": "Wide Receiver" },
    "stats": { "overall": { "value": 80 } }
  })
}

// ─── Resolver ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolver_scrapes_iteration_token() {
  let server = MockServer::start_async().await;
  let page = server
    .mock_async(|when, then| {
      when.method(GET).path("/ratings");
      then
        .status(200)
        .body(r#"<a href="/games/madden-nfl/ratings?iteration=12-week-12&team=kc">"#);
    })
    .await;

  let resolver = IterationResolver::new(client(), server.url("/ratings"), "12-week-11");
  assert_eq!(resolver.current_iteration().await, "12-week-12");
  page.assert_async().await;
}

#[tokio::test]
async fn resolver_falls_back_on_error_status() {
  let server = MockServer::start_async().await;
  server
    .mock_async(|when, then| {
      when.method(GET).path("/ratings");
      then.status(503);
    })
    .await;

  let resolver = IterationResolver::new(client(), server.url("/ratings"), "12-week-11");
  assert_eq!(resolver.current_iteration().await, "12-week-11");
}

#[tokio::test]
async fn resolver_falls_back_without_token() {
  let server = MockServer::start_async().await;
  server
    .mock_async(|when, then| {
      when.method(GET).path("/ratings");
      then.status(200).body("<html>maintenance</html>");
    })
    .await;

  let resolver = IterationResolver::new(client(), server.url("/ratings"), "12-week-11");
  assert_eq!(resolver.current_iteration().await, "12-week-11");
}

// ─── Primary snapshot ────────────────────────────────────────────────────────

#[tokio::test]
async fn pages_until_empty_then_serves_from_cache() {
  let server = MockServer::start_async().await;
  let dir = tempfile::tempdir().unwrap();

  let mut pages = Vec::new();
  for (offset, items) in [
    ("0", json!([item(1), item(2)])),
    ("2", json!([item(3)])),
    ("4", json!([])),
  ] {
    pages.push(
      server
        .mock_async(|when, then| {
          when
            .method(GET)
            .path("/rating/madden-nfl")
            .query_param("locale", "en")
            .query_param("limit", "2")
            .query_param("offset", offset)
            .query_param("iteration", "12-week-12")
            .header("accept", "application/json");
          then.status(200).json_body(json!({ "items": items }));
        })
        .await,
    );
  }

  let fetcher = SnapshotFetcher::new(client(), &primary_options(&server, dir.path()));
  let players = fetcher.fetch_snapshot("12-week-12").await.unwrap();
  assert_eq!(players.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);

  let cached = std::fs::read_to_string(dir.path().join("12-week-12.json")).unwrap();
  assert!(cached.contains("\n  {"), "cache should be pretty-printed");
  let raw: Vec<serde_json::Value> = serde_json::from_str(&cached).unwrap();
  assert_eq!(raw, vec![item(1), item(2), item(3)]);

  // A second fetch is served from the cache without touching the provider.
  let again = fetcher.fetch_snapshot("12-week-12").await.unwrap();
  assert_eq!(again, players);
  for page in &pages {
    page.assert_calls_async(1).await;
  }
}

#[tokio::test]
async fn missing_items_is_a_fetch_error() {
  let server = MockServer::start_async().await;
  let dir = tempfile::tempdir().unwrap();
  server
    .mock_async(|when, then| {
      when.method(GET).path("/rating/madden-nfl");
      then.status(200).json_body(json!({ "error": "bad iteration" }));
    })
    .await;

  let fetcher = SnapshotFetcher::new(client(), &primary_options(&server, dir.path()));
  let err = fetcher.fetch_snapshot("12-week-12").await.unwrap_err();
  assert!(matches!(err, Error::MissingItems { offset: 0 }));
  assert!(!dir.path().join("12-week-12.json").exists());
}

#[tokio::test]
async fn error_status_propagates_without_retry() {
  let server = MockServer::start_async().await;
  let dir = tempfile::tempdir().unwrap();
  let listing = server
    .mock_async(|when, then| {
      when.method(GET).path("/rating/madden-nfl");
      then.status(500);
    })
    .await;

  let fetcher = SnapshotFetcher::new(client(), &primary_options(&server, dir.path()));
  let err = fetcher.fetch_snapshot("12-week-12").await.unwrap_err();
  assert!(matches!(err, Error::Status { status, .. } if status.as_u16() == 500));
  listing.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_listing_is_cached_as_empty() {
  let server = MockServer::start_async().await;
  let dir = tempfile::tempdir().unwrap();
  server
    .mock_async(|when, then| {
      when.method(GET).path("/rating/madden-nfl");
      then.status(200).json_body(json!({ "items": [] }));
    })
    .await;

  let fetcher = SnapshotFetcher::new(client(), &primary_options(&server, dir.path()));
  assert!(fetcher.fetch_snapshot("12-week-12").await.unwrap().is_empty());
  assert!(dir.path().join("12-week-12.json").exists());
}

// ─── Secondary dataset ───────────────────────────────────────────────────────

#[tokio::test]
async fn secondary_week_is_fetched_once_and_cached() {
  let server = MockServer::start_async().await;
  let dir = tempfile::tempdir().unwrap();
  let week = server
    .mock_async(|when, then| {
      when.method(GET).path("/iterations/12/players.json");
      then.status(200).json_body(json!([{
        "roster_id": "r1",
        "first_name": "Player",
        "last_name": "1",
        "position": "WR",
        "height": 72,
        "weight": 200,
        "age": 25,
        "years_pro": 3,
        "trait_development": 2,
        "draft_positions": [45, 12, 99]
      }]));
    })
    .await;

  let fetcher = SecondaryFetcher::new(client(), &SecondaryOptions {
    base_url:  server.url("/iterations/"),
    cache_dir: dir.path().to_path_buf(),
  });

  let players = fetcher.fetch_week(12).await.unwrap();
  assert_eq!(players.len(), 1);
  assert_eq!(players[0].draft_positions, vec![45, 12, 99]);
  assert!(dir.path().join("mt-week-12.json").exists());

  assert_eq!(fetcher.fetch_week(12).await.unwrap(), players);
  week.assert_calls_async(1).await;
}

// ─── Cache scanning ──────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_cached_iteration_orders_by_season_then_week() {
  let dir = tempfile::tempdir().unwrap();
  for name in ["12-week-9.json", "12-week-11.json", "11-week-20.json", "notes.txt", "x-week-1.json"]
  {
    std::fs::write(dir.path().join(name), "[]").unwrap();
  }

  let (id, name) = latest_cached_iteration(dir.path()).await.unwrap().unwrap();
  assert_eq!(name, "12-week-11");
  assert_eq!((id.season_year, id.week_number), (12, 11));

  let missing = dir.path().join("absent");
  assert!(latest_cached_iteration(&missing).await.unwrap().is_none());
}
