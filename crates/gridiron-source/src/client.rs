//! Shared HTTP client construction.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::{Error, Result};

/// Both providers reject requests without a browser user agent.
pub const BROWSER_USER_AGENT: &str =
  "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Build the client shared by every fetcher.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
pub fn http_client(timeout: Duration) -> Result<Client> {
  Ok(
    Client::builder()
      .timeout(timeout)
      .user_agent(BROWSER_USER_AGENT)
      .build()?,
  )
}

/// Turn a non-success status into [`Error::Status`].
pub(crate) fn check_status(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let url = resp.url().to_string();
  tracing::warn!(%url, %status, "provider request failed");
  Err(Error::Status { url, status })
}
