mod channels;
mod defaults;

#[cfg(test)]
mod tests;

pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::SonobotError;
use defaults::*;

/// Top-level sonobot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sonos: SonosConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Leading character that marks a chat line as a command.
    #[serde(default = "default_trigger")]
    pub trigger: char,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Optional log file, written in addition to stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Run queue/transport/volume/playmode changes one at a time.
    #[serde(default)]
    pub serialize_mutations: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            trigger: default_trigger(),
            log_level: default_log_level(),
            log_file: None,
            serialize_mutations: false,
        }
    }
}

/// Sonos speaker connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonosConfig {
    #[serde(default)]
    pub ip: String,
    #[serde(default = "default_sonos_port")]
    pub port: u16,
    #[serde(default = "default_sonos_timeout")]
    pub timeout_secs: u64,
}

impl Default for SonosConfig {
    fn default() -> Self {
        Self {
            ip: String::new(),
            port: default_sonos_port(),
            timeout_secs: default_sonos_timeout(),
        }
    }
}

/// Spotify Web API credentials and search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// ISO country code passed as `market`; also selects the Sonos Spotify region.
    #[serde(default = "default_market")]
    pub market: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            market: default_market(),
            search_limit: default_search_limit(),
        }
    }
}

/// Bounds applied to user input by the orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Step used by `volume up` / `volume down`.
    #[serde(default = "default_volume_step")]
    pub volume_step: u8,
    /// Highest volume a user may set.
    #[serde(default = "default_volume_max")]
    pub volume_max: u8,
    #[serde(default = "default_playlist_name_max")]
    pub playlist_name_max: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            volume_step: default_volume_step(),
            volume_max: default_volume_max(),
            playlist_name_max: default_playlist_name_max(),
        }
    }
}

impl Config {
    /// Overlay secrets and host settings from the environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| get(key).filter(|v| !v.is_empty());
        if let Some(v) = non_empty("SLACK_BOT_TOKEN") {
            self.slack.bot_token = v;
        }
        if let Some(v) = non_empty("SPOTIFY_CLIENT_ID") {
            self.spotify.client_id = v;
        }
        if let Some(v) = non_empty("SPOTIFY_CLIENT_SECRET") {
            self.spotify.client_secret = v;
        }
        if let Some(v) = non_empty("SONOS_IP") {
            self.sonos.ip = v;
        }
    }

    /// Check that everything needed to talk to the speaker and catalog is present.
    pub fn validate(&self) -> Result<(), SonobotError> {
        let mut problems = Vec::new();
        if self.sonos.ip.is_empty() {
            problems.push("sonos.ip is empty (or set SONOS_IP)".to_string());
        }
        if self.spotify.client_id.is_empty() || self.spotify.client_secret.is_empty() {
            problems.push(
                "spotify.client_id / spotify.client_secret are required \
                 (or set SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET)"
                    .to_string(),
            );
        }
        if !(1..=50).contains(&self.spotify.search_limit) {
            problems.push(format!(
                "spotify.search_limit must be between 1 and 50, got {}",
                self.spotify.search_limit
            ));
        }
        if self.limits.volume_max > 100 {
            problems.push(format!(
                "limits.volume_max must be at most 100, got {}",
                self.limits.volume_max
            ));
        }
        if self.limits.volume_step == 0 {
            problems.push("limits.volume_step must be greater than 0".to_string());
        }
        if self.limits.playlist_name_max == 0 {
            problems.push("limits.playlist_name_max must be greater than 0".to_string());
        }
        if self.bot.trigger.is_whitespace() {
            problems.push("bot.trigger must not be whitespace".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SonobotError::Config(problems.join("; ")))
        }
    }
}

/// Load configuration from a TOML file and overlay the environment.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, SonobotError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SonobotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| SonobotError::Config(format!("failed to parse config: {}", e)))?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    config.apply_env();
    Ok(config)
}
