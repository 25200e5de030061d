//! Client-credentials access token, cached until shortly before it expires.

use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sonobot_core::error::SonobotError;
use tokio::sync::Mutex;
use tracing::debug;

use crate::types::TokenResponse;

/// Refresh this long before Spotify says the token expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub(crate) struct TokenCache {
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(token_url: String, client_id: String, client_secret: String) -> Self {
        Self {
            token_url,
            client_id,
            client_secret,
            cached: Mutex::new(None),
        }
    }

    fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }

    /// A valid access token, fetching a new one when needed.
    ///
    /// The lock is held across the fetch so concurrent searches share one request.
    pub async fn get(&self, client: &reqwest::Client) -> Result<String, SonobotError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!("spotify: requesting access token");
        let resp = client
            .post(&self.token_url)
            .header("Authorization", self.basic_auth())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| SonobotError::Catalog(format!("spotify token request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SonobotError::Catalog(format!(
                "spotify token endpoint returned {status}: {text}"
            )));
        }

        let parsed: TokenResponse = resp
            .json()
            .await
            .map_err(|e| SonobotError::Catalog(format!("spotify: bad token response: {e}")))?;

        let lifetime = Duration::from_secs(parsed.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: parsed.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(parsed.access_token)
    }

    /// Forget the cached token, e.g. after a 401.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }
}
