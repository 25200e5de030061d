//! Events API decoding.

use super::types::{EventEnvelope, InnerEvent};
use sonobot_core::{
    error::SonobotError,
    message::{IncomingMessage, ReplyTarget},
};
use tracing::debug;
use uuid::Uuid;

/// What an Events API request asks of us.
#[derive(Debug)]
pub enum SlackEvent {
    /// Echo the challenge back.
    UrlVerification(String),
    /// A human-authored channel message.
    Message(IncomingMessage),
    /// Anything else: edits, joins, bot messages, other event types.
    Ignored,
}

/// Decode an Events API request body.
pub fn parse_event(body: &[u8]) -> Result<SlackEvent, SonobotError> {
    let envelope: EventEnvelope = serde_json::from_slice(body)?;
    Ok(match envelope {
        EventEnvelope::UrlVerification { challenge } => SlackEvent::UrlVerification(challenge),
        EventEnvelope::EventCallback { event } => match to_message(event) {
            Some(msg) => SlackEvent::Message(msg),
            None => SlackEvent::Ignored,
        },
        EventEnvelope::Other => SlackEvent::Ignored,
    })
}

fn to_message(event: InnerEvent) -> Option<IncomingMessage> {
    if event.kind != "message" {
        debug!("slack: ignoring event type {}", event.kind);
        return None;
    }
    // Edits, joins and our own replies carry a subtype or a bot_id.
    if event.subtype.is_some() || event.bot_id.is_some() {
        return None;
    }

    let text = event.text?;
    let channel = event.channel?;
    let user = event.user?;

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "slack".to_string(),
        sender_id: user.clone(),
        text,
        timestamp: chrono::Utc::now(),
        reply_target: ReplyTarget {
            channel,
            user: Some(user),
            thread_ts: event.thread_ts,
        },
    })
}
