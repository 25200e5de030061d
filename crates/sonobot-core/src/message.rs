use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming chat line from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel implementation name (e.g. "slack", "console").
    pub channel: String,
    /// Platform-specific user ID.
    pub sender_id: String,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Where the reply should go.
    pub reply_target: ReplyTarget,
}

/// Destination of a reply: a chat channel and, optionally, a thread inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    /// Platform channel id (e.g. Slack `C0123ABC`).
    pub channel: String,
    /// User who triggered the command, when known.
    #[serde(default)]
    pub user: Option<String>,
    /// Thread timestamp to reply into (Slack `ts`).
    #[serde(default)]
    pub thread_ts: Option<String>,
}

impl ReplyTarget {
    /// Target a channel without threading.
    pub fn channel(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            user: None,
            thread_ts: None,
        }
    }
}

/// An outgoing reply to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    pub target: ReplyTarget,
}
