//! Slack channel.
//!
//! Replies go out through `chat.postMessage`. Inbound messages arrive over the
//! Events API, which posts to sonobot's HTTP server; the server hands each
//! event to [`SlackChannel::deliver`], which feeds the receiver returned by
//! `start()`.
//! Docs: <https://api.slack.com/web>, <https://api.slack.com/apis/events-api>

mod events;
mod send;
pub mod types;


pub use events::{parse_event, SlackEvent};

use async_trait::async_trait;
use sonobot_core::{
    config::SlackConfig,
    error::SonobotError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// Slack's documented `text` limit is 40k chars; stay well below it so code
/// blocks are rarely split.
const MAX_MESSAGE_LEN: usize = 3500;

/// Slack channel using the Web API for sends and the Events API for input.
pub struct SlackChannel {
    config: SlackConfig,
    client: reqwest::Client,
    base_url: String,
    inbound: Mutex<Option<mpsc::Sender<IncomingMessage>>>,
}

impl SlackChannel {
    /// Create a new Slack channel from config.
    pub fn new(config: SlackConfig) -> Self {
        Self::with_base_url(config, "https://slack.com/api")
    }

    /// Create a channel talking to a different Web API root (tests, proxies).
    pub fn with_base_url(config: SlackConfig, base_url: &str) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            inbound: Mutex::new(None),
        }
    }

    /// Hand an inbound message (decoded from an Events API request) to the gateway.
    ///
    /// Messages from channels outside `allowed_channels` are dropped here.
    pub async fn deliver(&self, message: IncomingMessage) -> Result<(), SonobotError> {
        if !self.config.allows(&message.reply_target.channel) {
            warn!(
                "slack: ignoring message from channel {} (not allowed)",
                message.reply_target.channel
            );
            return Ok(());
        }

        let guard = self.inbound.lock().await;
        let tx = guard
            .as_ref()
            .ok_or_else(|| SonobotError::Channel("slack channel not started".into()))?;
        tx.send(message)
            .await
            .map_err(|_| SonobotError::Channel("slack receiver dropped".into()))
    }

    /// Verify the bot token. Returns `(team, bot_user_id)`.
    pub async fn auth_test(&self) -> Result<(String, String), SonobotError> {
        let resp = self.call("auth.test", &serde_json::json!({})).await?;
        Ok((
            resp.team.unwrap_or_default(),
            resp.user_id.unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl Channel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, SonobotError> {
        match self.auth_test().await {
            Ok((team, user)) => info!("Slack connected to team '{team}' as {user}"),
            Err(e) => warn!("slack auth.test failed, sends will likely fail: {e}"),
        }

        let (tx, rx) = mpsc::channel(64);
        *self.inbound.lock().await = Some(tx);
        debug!("slack channel waiting for Events API deliveries");
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), SonobotError> {
        self.send_text(&message.target, &message.text).await
    }

    async fn stop(&self) -> Result<(), SonobotError> {
        self.inbound.lock().await.take();
        info!("Slack channel stopped");
        Ok(())
    }
}
