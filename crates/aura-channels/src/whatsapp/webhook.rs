//! Webhook payload extraction for the WhatsApp Cloud API.
//!
//! The Graph API wraps each inbound message in several layers of
//! entry/changes/value nesting; this module digs the useful fields out.

use serde_json::Value;

/// The useful parts of one inbound webhook message.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Sender's wa_id — the phone number used as delivery address.
    pub sender: String,
    /// Profile name from the contacts block, if present.
    pub sender_name: Option<String>,
    /// Platform message id.
    pub message_id: Option<String>,
    /// Text body for `type == "text"` messages.
    pub text: Option<String>,
    /// Media id for `type == "audio"` messages.
    pub audio_id: Option<String>,
}

impl InboundMessage {
    pub fn is_audio(&self) -> bool {
        self.audio_id.is_some()
    }
}

/// Extract the first message from a webhook payload.
///
/// Returns `None` for anything that is not a message notification
/// (status updates, malformed bodies) — the webhook answers those with
/// an "ignored" status, never an error.
pub fn extract_message(payload: &Value) -> Option<InboundMessage> {
    let value = payload
        .get("entry")?
        .get(0)?
        .get("changes")?
        .get(0)?
        .get("value")?;

    let message = value.get("messages")?.get(0)?;
    let contact = value.get("contacts").and_then(|c| c.get(0));

    let sender = message.get("from")?.as_str()?.to_string();
    let kind = message.get("type").and_then(|t| t.as_str());

    let text = match kind {
        Some("text") => message
            .get("text")
            .and_then(|t| t.get("body"))
            .and_then(|b| b.as_str())
            .map(str::to_string),
        _ => None,
    };

    let audio_id = match kind {
        Some("audio") => message
            .get("audio")
            .and_then(|a| a.get("id"))
            .and_then(|i| i.as_str())
            .map(str::to_string),
        _ => None,
    };

    Some(InboundMessage {
        sender,
        sender_name: contact
            .and_then(|c| c.get("profile"))
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
            .map(str::to_string),
        message_id: message
            .get("id")
            .and_then(|i| i.as_str())
            .map(str::to_string),
        text,
        audio_id,
    })
}
