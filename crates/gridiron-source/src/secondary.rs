//! Secondary dataset: per-week player lists with development traits and
//! draft positions.

use std::path::PathBuf;

use gridiron_core::reconcile::SecondaryPlayer;
use reqwest::{
  Client,
  header::{ACCEPT, REFERER},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, cache::FileCache, client::check_status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryOptions {
  /// Week listings live at `<base_url>/<week>/players.json`.
  pub base_url:  String,
  pub cache_dir: PathBuf,
}

impl Default for SecondaryOptions {
  fn default() -> Self {
    Self {
      base_url:  "https://static.madden.tools/madden-25/json/iterations".into(),
      cache_dir: PathBuf::from("maddentools_iterations"),
    }
  }
}

pub struct SecondaryFetcher {
  client:   Client,
  base_url: String,
  cache:    FileCache,
}

impl SecondaryFetcher {
  pub fn new(client: Client, options: &SecondaryOptions) -> Self {
    Self {
      client,
      base_url: options.base_url.trim_end_matches('/').to_owned(),
      cache: FileCache::new(&options.cache_dir),
    }
  }

  /// The week's player list, from `mt-week-<week>.json` if cached.
  pub async fn fetch_week(&self, week: i64) -> Result<Vec<SecondaryPlayer>> {
    let name = format!("mt-week-{week}");

    let raw = match self.cache.read(&name).await? {
      Some(raw) => {
        tracing::info!(week, "loaded secondary week from cache");
        raw
      }
      None => {
        let url = format!("{}/{week}/players.json", self.base_url);
        tracing::info!(week, %url, "fetching secondary week");
        let resp = self
          .client
          .get(&url)
          .header(REFERER, "https://madden.tools/")
          .header(ACCEPT, "application/json")
          .send()
          .await?;
        let raw: serde_json::Value = check_status(resp)?.json().await?;
        self.cache.write(&name, &raw).await?;
        raw
      }
    };

    serde_json::from_value(raw).map_err(|source| Error::Decode { what: name, source })
  }
}
