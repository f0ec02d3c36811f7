pub mod jikan;
pub mod tmdb;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

/// Builds the HTTP client shared by every remote metadata source.
pub fn http_client(timeout_seconds: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("planetstream/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}
