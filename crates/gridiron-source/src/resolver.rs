//! Current-iteration discovery.
//!
//! The provider does not publish the current iteration through its API, so
//! it is scraped from the public ratings page. The scrape is brittle by
//! nature; every failure degrades to a configured fallback name.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;

use crate::{Result, client::check_status};

static ITERATION_PARAM: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"iteration=([^"&]+)"#).expect("iteration parameter pattern is valid")
});

/// The first `iteration=<token>` occurrence in `html`.
pub fn extract_iteration(html: &str) -> Option<&str> {
  ITERATION_PARAM
    .captures(html)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

pub struct IterationResolver {
  client:   Client,
  page_url: String,
  fallback: String,
}

impl IterationResolver {
  pub fn new(client: Client, page_url: impl Into<String>, fallback: impl Into<String>) -> Self {
    Self { client, page_url: page_url.into(), fallback: fallback.into() }
  }

  /// The current iteration name. Never fails: transport errors, bad statuses
  /// and pages without a token all yield the fallback.
  pub async fn current_iteration(&self) -> String {
    match self.scrape().await {
      Ok(Some(name)) => {
        tracing::info!(iteration = %name, "resolved current iteration");
        name
      }
      Ok(None) => {
        tracing::warn!(
          url = %self.page_url,
          fallback = %self.fallback,
          "no iteration token on ratings page; using fallback"
        );
        self.fallback.clone()
      }
      Err(e) => {
        tracing::warn!(
          error = %e,
          fallback = %self.fallback,
          "failed to fetch ratings page; using fallback"
        );
        self.fallback.clone()
      }
    }
  }

  async fn scrape(&self) -> Result<Option<String>> {
    let resp = check_status(self.client.get(&self.page_url).send().await?)?;
    let html = resp.text().await?;
    Ok(extract_iteration(&html).map(str::to_owned))
  }
}
