//! Interactive-action bridge: turns a posted button payload into the same
//! [`Command`] a chat line produces.
//!
//! Button values look like `tag|verb|arg1|arg2`. Only payloads whose tag
//! matches the configured action tag belong to this bot.

use crate::commands::Command;
use sonobot_channels::slack::types::InteractivePayload;
use sonobot_core::{error::SonobotError, message::ReplyTarget};

/// A decoded button press ready for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub command: Command,
    pub target: ReplyTarget,
}

/// Split a button value. `None` when the tag is not ours or no verb follows it.
///
/// Remaining segments are joined with single spaces into the argument.
pub fn decode_value(value: &str, tag: &str) -> Option<Command> {
    let mut segments = value.split('|');
    if segments.next()? != tag {
        return None;
    }
    let verb = segments.next()?.trim();
    if verb.is_empty() {
        return None;
    }
    let argument = segments
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(Command::new(verb, &argument))
}

/// Parse a request body into a payload.
///
/// Accepts the form encoding Slack posts (`payload=<url-encoded JSON>`) as
/// well as the bare JSON object.
pub fn parse_payload(body: &[u8]) -> Result<InteractivePayload, SonobotError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| SonobotError::Channel(format!("payload is not UTF-8: {e}")))?
        .trim();

    if text.starts_with('{') {
        return Ok(serde_json::from_str(text)?);
    }

    let encoded = text
        .split('&')
        .find_map(|pair| pair.strip_prefix("payload="))
        .ok_or_else(|| SonobotError::Channel("form body has no payload field".into()))?;
    let plus_decoded = encoded.replace('+', " ");
    let json = urlencoding::decode(&plus_decoded)
        .map_err(|e| SonobotError::Channel(format!("payload is not valid UTF-8: {e}")))?;
    Ok(serde_json::from_str(&json)?)
}

/// Resolve a payload to a command for this bot.
///
/// `Ok(None)` means the payload is well formed but meant for another module.
/// A payload with no action value or no channel is an error.
pub fn resolve(payload: &InteractivePayload, tag: &str) -> Result<Option<ActionRequest>, SonobotError> {
    let value = payload
        .actions
        .first()
        .and_then(|a| a.value.as_deref())
        .ok_or_else(|| SonobotError::Channel("payload has no action value".into()))?;
    let channel = payload
        .channel
        .as_ref()
        .map(|c| c.id.clone())
        .ok_or_else(|| SonobotError::Channel("payload has no channel".into()))?;

    let Some(command) = decode_value(value, tag) else {
        return Ok(None);
    };

    Ok(Some(ActionRequest {
        command,
        target: ReplyTarget {
            channel,
            user: payload.user.as_ref().map(|u| u.id.clone()),
            thread_ts: payload.message.as_ref().map(|m| m.ts.clone()),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "type": "block_actions",
        "actions": [{ "action_id": "a1", "value": "sonos|playmode|shuffle|norepeat" }],
        "channel": { "id": "C042", "name": "music" },
        "user": { "id": "U7", "username": "dana" },
        "message": { "ts": "1712345678.000100", "text": "Pick a mode" }
    }"#;

    #[test]
    fn test_decode_value_joins_arguments() {
        let cmd = decode_value("sonos|playmode|shuffle|norepeat", "sonos").unwrap();
        assert_eq!(cmd.verb, "playmode");
        assert_eq!(cmd.argument, "shuffle norepeat");

        let cmd = decode_value("sonos|Play", "sonos").unwrap();
        assert_eq!(cmd, Command::new("play", ""));
    }

    #[test]
    fn test_decode_value_other_module() {
        assert!(decode_value("jira|play", "sonos").is_none());
        assert!(decode_value("sonos", "sonos").is_none());
        assert!(decode_value("sonos||x", "sonos").is_none());
        assert!(decode_value("", "sonos").is_none());
    }

    #[test]
    fn test_parse_payload_raw_json() {
        let payload = parse_payload(PAYLOAD.as_bytes()).unwrap();
        let request = resolve(&payload, "sonos").unwrap().unwrap();
        assert_eq!(request.command, Command::new("playmode", "shuffle norepeat"));
        assert_eq!(request.target.channel, "C042");
        assert_eq!(request.target.user.as_deref(), Some("U7"));
        assert_eq!(request.target.thread_ts.as_deref(), Some("1712345678.000100"));
    }

    #[test]
    fn test_parse_payload_form_encoded() {
        let json = r#"{"actions":[{"value":"sonos|add|never gonna"}],"channel":{"id":"C1"}}"#;
        let body = format!("payload={}", urlencoding::encode(json).replace("%20", "+"));
        let payload = parse_payload(body.as_bytes()).unwrap();
        let request = resolve(&payload, "sonos").unwrap().unwrap();
        assert_eq!(request.command, Command::new("add", "never gonna"));
        assert_eq!(request.target.user, None);
        assert_eq!(request.target.thread_ts, None);
    }

    #[test]
    fn test_resolve_ignores_other_tags() {
        let json = PAYLOAD.replace("sonos|", "jira|");
        let payload = parse_payload(json.as_bytes()).unwrap();
        assert_eq!(resolve(&payload, "sonos").unwrap(), None);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(parse_payload(b"token=abc").is_err());
        assert!(parse_payload(b"{not json").is_err());
        assert!(parse_payload(&[0xff, 0xfe]).is_err());

        let payload = parse_payload(br#"{"actions":[],"channel":{"id":"C1"}}"#).unwrap();
        assert!(resolve(&payload, "sonos").is_err());

        let payload = parse_payload(br#"{"actions":[{"value":"sonos|play"}]}"#).unwrap();
        assert!(resolve(&payload, "sonos").is_err());
    }
}
