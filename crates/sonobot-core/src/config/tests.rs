use super::*;
use std::collections::HashMap;

fn valid_config() -> Config {
    let mut cfg = Config::default();
    cfg.sonos.ip = "192.168.1.20".to_string();
    cfg.spotify.client_id = "id".to_string();
    cfg.spotify.client_secret = "secret".to_string();
    cfg
}

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.bot.trigger, '!');
    assert_eq!(cfg.bot.log_level, "info");
    assert!(!cfg.bot.serialize_mutations);
    assert_eq!(cfg.sonos.port, 1400);
    assert_eq!(cfg.spotify.market, "US");
    assert_eq!(cfg.spotify.search_limit, 5);
    assert_eq!(cfg.limits.volume_step, 5);
    assert_eq!(cfg.limits.volume_max, 75);
    assert_eq!(cfg.limits.playlist_name_max, 30);
    assert_eq!(cfg.api.action_tag, "sonos");
    assert!(cfg.slack.allowed_channels.is_empty());
}

#[test]
fn test_parse_full_toml() {
    let toml_str = r#"
        [bot]
        trigger = "?"
        serialize_mutations = true

        [slack]
        bot_token = "xoxb-1"
        allowed_channels = ["C1", "C2"]

        [api]
        port = 8080
        action_tag = "jukebox"

        [sonos]
        ip = "10.0.0.5"

        [spotify]
        client_id = "abc"
        client_secret = "def"
        market = "GB"
        search_limit = 10

        [limits]
        volume_step = 10
        volume_max = 60
        playlist_name_max = 20
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.bot.trigger, '?');
    assert!(cfg.bot.serialize_mutations);
    assert_eq!(cfg.slack.bot_token, "xoxb-1");
    assert_eq!(cfg.slack.allowed_channels, vec!["C1", "C2"]);
    assert_eq!(cfg.api.port, 8080);
    assert_eq!(cfg.api.action_tag, "jukebox");
    assert_eq!(cfg.sonos.ip, "10.0.0.5");
    assert_eq!(cfg.sonos.port, 1400);
    assert_eq!(cfg.spotify.market, "GB");
    assert_eq!(cfg.spotify.search_limit, 10);
    assert_eq!(cfg.limits.volume_step, 10);
    assert_eq!(cfg.limits.volume_max, 60);
    assert_eq!(cfg.limits.playlist_name_max, 20);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_empty_toml_uses_defaults() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.bot.name, "sonobot");
    assert_eq!(cfg.limits.volume_max, 75);
}

#[test]
fn test_env_overrides_secrets() {
    let env: HashMap<&str, &str> = [
        ("SLACK_BOT_TOKEN", "xoxb-env"),
        ("SPOTIFY_CLIENT_ID", "env-id"),
        ("SPOTIFY_CLIENT_SECRET", ""),
        ("SONOS_IP", "10.1.1.1"),
    ]
    .into_iter()
    .collect();

    let mut cfg = Config::default();
    cfg.spotify.client_secret = "from-file".to_string();
    cfg.apply_env_from(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(cfg.slack.bot_token, "xoxb-env");
    assert_eq!(cfg.spotify.client_id, "env-id");
    // Empty env values do not clobber the file.
    assert_eq!(cfg.spotify.client_secret, "from-file");
    assert_eq!(cfg.sonos.ip, "10.1.1.1");
}

#[test]
fn test_validate_reports_missing_values() {
    let err = Config::default().validate().unwrap_err().to_string();
    assert!(err.contains("sonos.ip"));
    assert!(err.contains("spotify.client_id"));
}

#[test]
fn test_validate_rejects_bad_limits() {
    let mut cfg = valid_config();
    cfg.limits.volume_max = 101;
    cfg.limits.volume_step = 0;
    cfg.spotify.search_limit = 0;
    let err = cfg.validate().unwrap_err().to_string();
    assert!(err.contains("volume_max"));
    assert!(err.contains("volume_step"));
    assert!(err.contains("search_limit"));
}

#[test]
fn test_slack_allows() {
    let mut slack = SlackConfig::default();
    assert!(slack.allows("C1"), "empty list allows everything");
    slack.allowed_channels = vec!["C1".to_string()];
    assert!(slack.allows("C1"));
    assert!(!slack.allows("C2"));
}

#[test]
fn test_load_missing_file_falls_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("missing.toml");
    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.bot.trigger, '!');
}

#[test]
fn test_load_reports_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bad.toml");
    std::fs::write(&path, "[limits]\nvolume_max = \"loud\"\n").unwrap();
    let err = load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, SonobotError::Config(_)));
}
