//! Web API calls: `chat.postMessage` and friends.

use super::types::{PostMessage, SlackResponse};
use super::{SlackChannel, MAX_MESSAGE_LEN};
use crate::utils::split_fenced;
use serde::Serialize;
use sonobot_core::{error::SonobotError, message::ReplyTarget};
use tracing::debug;

impl SlackChannel {
    /// POST a JSON body to a Web API method and check the `ok` flag.
    pub(crate) async fn call<B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<SlackResponse, SonobotError> {
        let url = format!("{}/{method}", self.base_url);
        debug!("slack: POST {url}");

        let resp: SlackResponse = self
            .client
            .post(&url)
            .bearer_auth(&self.config.bot_token)
            .json(body)
            .send()
            .await
            .map_err(|e| SonobotError::Channel(format!("slack {method} failed: {e}")))?
            .json()
            .await
            .map_err(|e| SonobotError::Channel(format!("slack {method} parse failed: {e}")))?;

        if !resp.ok {
            return Err(SonobotError::Channel(format!(
                "slack {method} error: {}",
                resp.error.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(resp)
    }

    /// Send text to a channel, splitting it when it exceeds Slack's limit.
    /// Code blocks cut by a split are closed and reopened per message.
    pub(crate) async fn send_text(
        &self,
        target: &ReplyTarget,
        text: &str,
    ) -> Result<(), SonobotError> {
        if target.channel.is_empty() {
            return Err(SonobotError::Channel("no channel on reply target".into()));
        }

        for chunk in split_fenced(text, MAX_MESSAGE_LEN) {
            let body = PostMessage {
                channel: &target.channel,
                text: &chunk,
                mrkdwn: true,
                thread_ts: target.thread_ts.as_deref(),
            };
            self.call("chat.postMessage", &body).await?;
        }
        Ok(())
    }
}
