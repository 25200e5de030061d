//! Local terminal channel: stdin lines in, replies on stdout.
//!
//! Used by `sonobot run` and `sonobot console` to drive the speaker without Slack.

use async_trait::async_trait;
use sonobot_core::{
    error::SonobotError,
    message::{IncomingMessage, OutgoingMessage, ReplyTarget},
    traits::Channel,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Channel id used for every console message.
pub const CONSOLE_TARGET: &str = "console";

#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }

    /// Wrap a line typed at the terminal as an incoming message.
    pub fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            id: Uuid::new_v4(),
            channel: "console".to_string(),
            sender_id: whoami(),
            text: text.to_string(),
            timestamp: chrono::Utc::now(),
            reply_target: ReplyTarget::channel(CONSOLE_TARGET),
        }
    }
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "console".to_string())
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, SonobotError> {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim().is_empty() {
                    continue;
                }
                if tx.send(ConsoleChannel::message(&line)).await.is_err() {
                    break;
                }
            }
            info!("console input closed");
        });
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), SonobotError> {
        println!("{}", message.text);
        Ok(())
    }

    async fn stop(&self) -> Result<(), SonobotError> {
        Ok(())
    }
}
