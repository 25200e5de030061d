//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "sonobot".to_string()
}

pub fn default_trigger() -> char {
    '!'
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_api_port() -> u16 {
    3000
}

pub fn default_action_tag() -> String {
    "sonos".to_string()
}

pub fn default_sonos_port() -> u16 {
    1400
}

pub fn default_sonos_timeout() -> u64 {
    10
}

pub fn default_market() -> String {
    "US".to_string()
}

pub fn default_search_limit() -> usize {
    5
}

pub fn default_volume_step() -> u8 {
    5
}

pub fn default_volume_max() -> u8 {
    75
}

pub fn default_playlist_name_max() -> usize {
    30
}
