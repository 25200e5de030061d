mod actions;
mod api;
mod commands;
mod gateway;
#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use commands::{Command, Orchestrator, Outcome};
use sonobot_channels::{
    console::{ConsoleChannel, CONSOLE_TARGET},
    slack::SlackChannel,
};
use sonobot_core::{
    config::{self, BotConfig, Config},
    message::ReplyTarget,
    traits::{Channel, Device},
};
use sonobot_sonos::SonosDevice;
use sonobot_spotify::SpotifyCatalog;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "sonobot",
    version,
    about = "Drive a Sonos speaker from Slack, with Spotify search"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, env = "SONOBOT_CONFIG", default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot: Slack channel, gateway and HTTP API.
    Start,
    /// Show the configuration and check the speaker and Spotify.
    Status,
    /// Run a single chat command and print the reply.
    Run {
        /// The command line, with or without the trigger (e.g. `volume up`).
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_tracing(&cfg.bot)?;

    match cli.command {
        Commands::Start => {
            cfg.validate()?;

            if !cfg.slack.enabled {
                anyhow::bail!("No channels enabled. Enable [slack] in config.toml.");
            }
            if cfg.slack.bot_token.is_empty() {
                anyhow::bail!(
                    "Slack is enabled but bot_token is empty. \
                     Set it in config.toml or SLACK_BOT_TOKEN env var."
                );
            }

            let slack = Arc::new(SlackChannel::new(cfg.slack.clone()));
            let orchestrator = Arc::new(build_orchestrator(&cfg, slack.clone())?);

            let channels: Vec<Arc<dyn Channel>> = vec![slack.clone()];
            let mut gw = gateway::Gateway::new(orchestrator.clone(), channels);
            if cfg.api.enabled {
                let state = api::ApiState::new(orchestrator, Some(slack), &cfg.api.action_tag)
                    .with_allowed_channels(cfg.slack.allowed_channels.clone());
                gw = gw.with_api(cfg.api.clone(), state);
            } else {
                warn!("HTTP API is disabled; Slack events and button presses cannot reach the bot");
            }

            println!("sonobot - starting {} ...", cfg.bot.name);
            Arc::new(gw).run().await?;
        }
        Commands::Status => {
            println!("sonobot - Status Check\n");
            println!("Config: {}", cli.config);
            println!("Trigger: {}", cfg.bot.trigger);
            println!(
                "Limits: volume max {}%, step {}, playlist names <= {} chars",
                cfg.limits.volume_max, cfg.limits.volume_step, cfg.limits.playlist_name_max
            );
            println!(
                "Mutations: {}",
                if cfg.bot.serialize_mutations {
                    "serialized"
                } else {
                    "concurrent"
                }
            );
            println!();

            match cfg.validate() {
                Ok(()) => println!("  config: ok"),
                Err(e) => println!("  config: {e}"),
            }

            println!(
                "  slack: {}",
                if cfg.slack.enabled && !cfg.slack.bot_token.is_empty() {
                    "configured"
                } else if cfg.slack.enabled {
                    "enabled but missing bot_token"
                } else {
                    "disabled"
                }
            );
            println!(
                "  api: {}",
                if cfg.api.enabled {
                    format!("{}:{} (action tag '{}')", cfg.api.host, cfg.api.port, cfg.api.action_tag)
                } else {
                    "disabled".to_string()
                }
            );

            if cfg.sonos.ip.is_empty() {
                println!("  sonos: not configured");
            } else {
                let device = SonosDevice::new(&cfg.sonos, &cfg.spotify.market)?;
                match device.volume().await {
                    Ok(v) => println!("  sonos: reachable at {} (volume {v}%)", cfg.sonos.ip),
                    Err(e) => println!("  sonos: unreachable at {} ({e})", cfg.sonos.ip),
                }
            }

            if cfg.spotify.client_id.is_empty() {
                println!("  spotify: not configured");
            } else {
                let catalog = SpotifyCatalog::from_config(&cfg.spotify);
                match catalog.check_credentials().await {
                    Ok(()) => println!("  spotify: credentials ok (market {})", cfg.spotify.market),
                    Err(e) => println!("  spotify: {e}"),
                }
            }
        }
        Commands::Run { line } => {
            if line.is_empty() {
                anyhow::bail!("no command provided. Usage: sonobot run <command>");
            }

            cfg.validate()?;
            let text = with_trigger(&line.join(" "), cfg.bot.trigger);
            let Some(command) = Command::parse(&text, cfg.bot.trigger) else {
                anyhow::bail!("could not parse '{text}'");
            };

            let orchestrator = build_orchestrator(&cfg, Arc::new(ConsoleChannel::new()))?;
            let outcome = orchestrator
                .execute(command, ReplyTarget::channel(CONSOLE_TARGET))
                .await;
            if let Outcome::Failed { .. } = outcome {
                anyhow::bail!("command failed, see the log for details");
            }
        }
    }

    Ok(())
}

/// Wire the real speaker and catalog to an orchestrator replying on `replies`.
fn build_orchestrator(cfg: &Config, replies: Arc<dyn Channel>) -> anyhow::Result<Orchestrator> {
    let device = Arc::new(SonosDevice::new(&cfg.sonos, &cfg.spotify.market)?);
    let catalog = Arc::new(SpotifyCatalog::from_config(&cfg.spotify));
    Ok(Orchestrator::new(
        device,
        catalog,
        replies,
        cfg.limits,
        cfg.spotify.search_limit,
        cfg.bot.trigger,
    )
    .with_serialized_mutations(cfg.bot.serialize_mutations))
}

/// Prefix `text` with the trigger unless it already starts with it.
fn with_trigger(text: &str, trigger: char) -> String {
    let text = text.trim();
    if text.starts_with(trigger) {
        text.to_string()
    } else {
        format!("{trigger}{text}")
    }
}

/// Log to stderr, and also to `bot.log_file` when set. `RUST_LOG` wins over
/// `bot.log_level`. The returned guard must live as long as the process.
fn init_tracing(bot: &BotConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&bot.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_file) = &bot.log_file else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("bot.log_file '{log_file}' has no file name"))?;
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_trigger() {
        assert_eq!(with_trigger("volume up", '!'), "!volume up");
        assert_eq!(with_trigger("!volume up", '!'), "!volume up");
        assert_eq!(with_trigger("  current ", '.'), ".current");
    }

    #[test]
    fn test_cli_run_collects_words() {
        let cli = Cli::try_parse_from(["sonobot", "run", "add", "never", "gonna"]).unwrap();
        match cli.command {
            Commands::Run { line } => assert_eq!(line, vec!["add", "never", "gonna"]),
            _ => panic!("expected run"),
        }
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::try_parse_from(["sonobot", "--config", "/etc/sonobot.toml", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.config, "/etc/sonobot.toml");
    }
}
