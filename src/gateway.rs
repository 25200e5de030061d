//! Gateway: the main event loop connecting chat channels to the orchestrator.
//!
//! Every inbound line is parsed against the trigger; commands run
//! concurrently, each in its own task, and are never cancelled once started.

use crate::{
    api::{self, ApiState},
    commands::{Command, Orchestrator, Outcome},
};
use sonobot_core::{config::ApiConfig, message::IncomingMessage, traits::Channel};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, error, info, warn};

/// Routes messages between channels and the orchestrator.
pub struct Gateway {
    orchestrator: Arc<Orchestrator>,
    channels: Vec<Arc<dyn Channel>>,
    api: Option<(ApiConfig, ApiState)>,
}

impl Gateway {
    pub fn new(orchestrator: Arc<Orchestrator>, channels: Vec<Arc<dyn Channel>>) -> Self {
        Self {
            orchestrator,
            channels,
            api: None,
        }
    }

    /// Also serve the HTTP API while the gateway runs.
    pub fn with_api(mut self, config: ApiConfig, state: ApiState) -> Self {
        self.api = Some((config, state));
        self
    }

    /// Run until Ctrl-C or until every channel has closed.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "sonobot gateway running | trigger: {} | channels: {}",
            self.orchestrator.trigger(),
            self.channels
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", "),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for channel in &self.channels {
            let name = channel.name().to_string();
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        let api_handle = self.api.as_ref().map(|(config, state)| {
            let (config, state) = (config.clone(), state.clone());
            tokio::spawn(async move {
                api::serve(config, state).await;
            })
        });

        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                incoming = rx.recv() => match incoming {
                    Some(incoming) => {
                        let gw = self.clone();
                        in_flight.spawn(async move {
                            gw.dispatch(incoming).await;
                        });
                    }
                    None => {
                        info!("All channels closed");
                        break;
                    }
                },
                Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = done {
                        error!("command task failed: {e}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(api_handle, in_flight).await;
        Ok(())
    }

    /// Parse one inbound line and run it. Lines without the trigger are ignored.
    pub(crate) async fn dispatch(&self, incoming: IncomingMessage) -> Option<Outcome> {
        let Some(command) = Command::parse(&incoming.text, self.orchestrator.trigger()) else {
            debug!("ignoring non-command message from {}", incoming.sender_id);
            return None;
        };

        info!(
            "[{}] {} -> {}{} {}",
            incoming.channel,
            incoming.sender_id,
            self.orchestrator.trigger(),
            command.verb,
            command.argument
        );
        Some(self.orchestrator.execute(command, incoming.reply_target).await)
    }

    /// Let running chat commands finish, stop the API, let its button
    /// commands finish, then stop the channels.
    async fn shutdown(
        &self,
        api_handle: Option<tokio::task::JoinHandle<()>>,
        mut in_flight: JoinSet<()>,
    ) {
        info!("Shutting down...");

        if !in_flight.is_empty() {
            info!("waiting for {} running command(s)", in_flight.len());
        }
        while let Some(done) = in_flight.join_next().await {
            if let Err(e) = done {
                error!("command task failed: {e}");
            }
        }

        if let Some(h) = api_handle {
            h.abort();
        }
        if let Some((_, state)) = &self.api {
            state.drain().await;
        }

        for channel in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {}: {e}", channel.name());
            }
        }

        info!("Shutdown complete.");
    }
}
