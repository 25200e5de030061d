use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Slack bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Bot user OAuth token (`xoxb-...`).
    #[serde(default)]
    pub bot_token: String,
    /// Channel ids allowed to issue commands. Empty = allow all.
    #[serde(default)]
    pub allowed_channels: Vec<String>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_token: String::new(),
            allowed_channels: Vec::new(),
        }
    }
}

impl SlackConfig {
    /// Whether commands from `channel` are accepted.
    pub fn allows(&self, channel: &str) -> bool {
        self.allowed_channels.is_empty() || self.allowed_channels.iter().any(|c| c == channel)
    }
}

/// HTTP API configuration -- Slack events and interactive button payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
    /// Module tag that selects this bot in `tag|verb|arg...` button values.
    #[serde(default = "default_action_tag")]
    pub action_tag: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_api_host(),
            port: default_api_port(),
            action_tag: default_action_tag(),
        }
    }
}
