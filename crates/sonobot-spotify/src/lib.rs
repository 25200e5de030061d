//! # sonobot-spotify
//!
//! Spotify Web API search behind the `Catalog` trait. Authenticates with the
//! client-credentials flow; no user account is involved.

mod auth;
mod types;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use reqwest::StatusCode;
use sonobot_core::{
    config::SpotifyConfig,
    error::SonobotError,
    model::{SearchKind, SearchResult},
    traits::Catalog,
};
use tracing::{debug, warn};

use auth::TokenCache;
use types::SearchResponse;

const ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const API_URL: &str = "https://api.spotify.com";

/// Spotify catalog search.
pub struct SpotifyCatalog {
    client: reqwest::Client,
    api_url: String,
    market: String,
    token: TokenCache,
}

impl SpotifyCatalog {
    /// Create from config values.
    pub fn from_config(config: &SpotifyConfig) -> Self {
        Self::with_urls(config, ACCOUNTS_URL, API_URL)
    }

    /// Create against different accounts/API roots (tests, proxies).
    pub fn with_urls(config: &SpotifyConfig, accounts_url: &str, api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            market: config.market.clone(),
            token: TokenCache::new(
                format!("{}/api/token", accounts_url.trim_end_matches('/')),
                config.client_id.clone(),
                config.client_secret.clone(),
            ),
        }
    }

    /// Fetch a token without searching. Used by `sonobot status`.
    pub async fn check_credentials(&self) -> Result<(), SonobotError> {
        self.token.get(&self.client).await.map(|_| ())
    }

    async fn request(
        &self,
        kind: SearchKind,
        query: &str,
        limit: usize,
    ) -> Result<reqwest::Response, SonobotError> {
        let token = self.token.get(&self.client).await?;
        let url = format!("{}/v1/search", self.api_url);
        let limit = limit.to_string();
        debug!("spotify: GET {url} type={kind} q={query:?}");

        self.client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("type", kind.as_str()),
                ("limit", limit.as_str()),
                ("market", self.market.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SonobotError::Catalog(format!("spotify request failed: {e}")))
    }
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    fn name(&self) -> &str {
        "spotify"
    }

    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SonobotError> {
        let mut resp = self.request(kind, query, limit).await?;

        // An expired or revoked token gets one fresh attempt.
        if resp.status() == StatusCode::UNAUTHORIZED {
            warn!("spotify: token rejected, refreshing");
            self.token.invalidate().await;
            resp = self.request(kind, query, limit).await?;
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SonobotError::Catalog(format!(
                "spotify returned {status}: {text}"
            )));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SonobotError::Catalog(format!("spotify: failed to parse response: {e}")))?;

        Ok(parsed.into_results(limit))
    }
}
