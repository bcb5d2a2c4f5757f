//! Primary provider: paginated rating snapshots per iteration.

use std::{path::PathBuf, time::Duration};

use gridiron_core::snapshot::PlayerSnapshot;
use reqwest::{
  Client,
  header::{ACCEPT, ORIGIN, REFERER},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, cache::FileCache, client::check_status};

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryOptions {
  /// Listing endpoint queried with `locale`, `limit`, `offset`, `iteration`.
  pub base_url:           String,
  /// Public page scraped for the current iteration name.
  pub ratings_page_url:   String,
  pub locale:             String,
  pub page_size:          usize,
  /// Pause between consecutive non-empty pages.
  pub page_delay_ms:      u64,
  /// Used when the ratings page cannot be scraped.
  pub fallback_iteration: String,
  pub cache_dir:          PathBuf,
}

impl Default for PrimaryOptions {
  fn default() -> Self {
    Self {
      base_url:           "https://drop-api.ea.com/rating/madden-nfl".into(),
      ratings_page_url:   "https://www.ea.com/games/madden-nfl/ratings".into(),
      locale:             "en".into(),
      page_size:          100,
      page_delay_ms:      1000,
      fallback_iteration: "12-week-11".into(),
      cache_dir:          PathBuf::from("iterations"),
    }
  }
}

// ─── Fetcher ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PageQuery<'a> {
  locale:    &'a str,
  limit:     usize,
  offset:    usize,
  iteration: &'a str,
}

#[derive(Deserialize)]
struct Page {
  items: Option<Vec<serde_json::Value>>,
}

/// Fetches the full player listing for an iteration, cache first.
pub struct SnapshotFetcher {
  client:     Client,
  base_url:   String,
  locale:     String,
  page_size:  usize,
  page_delay: Duration,
  cache:      FileCache,
}

impl SnapshotFetcher {
  pub fn new(client: Client, options: &PrimaryOptions) -> Self {
    Self {
      client,
      base_url: options.base_url.clone(),
      locale: options.locale.clone(),
      page_size: options.page_size.max(1),
      page_delay: Duration::from_millis(options.page_delay_ms),
      cache: FileCache::new(&options.cache_dir),
    }
  }

  pub fn cache(&self) -> &FileCache { &self.cache }

  /// Every player in `iteration`. A cached listing is returned as-is;
  /// otherwise the provider is paged until it returns an empty page and the
  /// raw items are cached before returning.
  pub async fn fetch_snapshot(&self, iteration: &str) -> Result<Vec<PlayerSnapshot>> {
    if let Some(players) = self.cached(iteration).await? {
      tracing::info!(iteration, players = players.len(), "loaded iteration from cache");
      return Ok(players);
    }

    tracing::info!(iteration, "fetching iteration from provider");
    let items = serde_json::Value::Array(self.fetch_pages(iteration).await?);
    self.cache.write(iteration, &items).await?;
    decode_players(iteration, items)
  }

  /// The cached listing for `iteration`, if any.
  pub async fn cached(&self, iteration: &str) -> Result<Option<Vec<PlayerSnapshot>>> {
    self
      .cache
      .read(iteration)
      .await?
      .map(|raw| decode_players(iteration, raw))
      .transpose()
  }

  async fn fetch_pages(&self, iteration: &str) -> Result<Vec<serde_json::Value>> {
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
      tracing::debug!(offset, limit = self.page_size, "fetching page");
      let resp = self
        .client
        .get(&self.base_url)
        .query(&PageQuery {
          locale: &self.locale,
          limit: self.page_size,
          offset,
          iteration,
        })
        .header(REFERER, "https://www.ea.com/")
        .header(ORIGIN, "https://www.ea.com")
        .header(ACCEPT, "application/json")
        .send()
        .await?;
      let page: Page = check_status(resp)?.json().await?;

      let page_items = page.items.ok_or(Error::MissingItems { offset })?;
      if page_items.is_empty() {
        break;
      }
      items.extend(page_items);
      offset += self.page_size;

      tokio::time::sleep(self.page_delay).await;
    }

    tracing::info!(iteration, players = items.len(), "fetched iteration");
    Ok(items)
  }
}

fn decode_players(iteration: &str, raw: serde_json::Value) -> Result<Vec<PlayerSnapshot>> {
  serde_json::from_value(raw)
    .map_err(|source| Error::Decode { what: format!("players of {iteration}"), source })
}
