//! Slack Web API, Events API and interactivity payload types.

use serde::{Deserialize, Serialize};

/// Envelope returned by every Web API method.
#[derive(Debug, Deserialize)]
pub(crate) struct SlackResponse {
    pub ok: bool,
    pub error: Option<String>,
    /// Present on `auth.test`.
    pub user_id: Option<String>,
    /// Present on `auth.test`.
    pub team: Option<String>,
}

/// Body of `chat.postMessage`.
#[derive(Debug, Serialize)]
pub(crate) struct PostMessage<'a> {
    pub channel: &'a str,
    pub text: &'a str,
    pub mrkdwn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<&'a str>,
}

/// Outer Events API request.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Sent once when the request URL is configured.
    UrlVerification { challenge: String },
    EventCallback { event: InnerEvent },
    #[serde(other)]
    Other,
}

/// The `event` object of an `event_callback`. Only message fields are kept.
#[derive(Debug, Deserialize)]
pub struct InnerEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

/// Interactive component payload (`block_actions`), reduced to what command
/// dispatch needs.
#[derive(Debug, Deserialize)]
pub struct InteractivePayload {
    #[serde(default)]
    pub actions: Vec<PayloadAction>,
    pub channel: Option<PayloadId>,
    pub user: Option<PayloadId>,
    pub message: Option<PayloadMessage>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadAction {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct PayloadMessage {
    pub ts: String,
}
