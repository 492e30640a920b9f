//! Wire contract between the widget and the chat server.
//!
//! Every frame is a JSON object carrying the event name and an optional
//! payload: `{"event": "send_message", "data": {"message": "hi"}}`.

use crate::types::Sender;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SEND_MESSAGE: &str = "send_message";
pub const TOGGLE_REASONING: &str = "toggle_reasoning";
pub const REASONING_TOGGLED: &str = "reasoning_toggled";
pub const RECEIVE_MESSAGE: &str = "receive_message";

const INBOUND_EVENTS: &[&str] = &[REASONING_TOGGLED, RECEIVE_MESSAGE];

/// Events the widget emits towards the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    SendMessage { message: String },
    ToggleReasoning,
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::SendMessage { .. } => SEND_MESSAGE,
            OutboundEvent::ToggleReasoning => TOGGLE_REASONING,
        }
    }
}

/// Events the server pushes to the widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    ReasoningToggled {
        enabled: bool,
    },
    ReceiveMessage {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<Sender>,
    },
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::ReasoningToggled { .. } => REASONING_TOGGLED,
            InboundEvent::ReceiveMessage { .. } => RECEIVE_MESSAGE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Frame has no event name")]
    MissingEvent,

    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

pub fn encode_frame(event: &OutboundEvent) -> Result<String, WireError> {
    Ok(serde_json::to_string(event)?)
}

pub fn decode_frame(frame: &str) -> Result<InboundEvent, WireError> {
    let value: Value = serde_json::from_str(frame)?;
    let name = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or(WireError::MissingEvent)?;
    if !INBOUND_EVENTS.contains(&name) {
        return Err(WireError::UnknownEvent(name.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn send_message_frame_layout() {
        let frame = encode_frame(&OutboundEvent::SendMessage {
            message: "hello".into(),
        })
        .unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, json!({"event": "send_message", "data": {"message": "hello"}}));
    }

    #[test]
    fn toggle_frame_has_no_payload() {
        let frame = encode_frame(&OutboundEvent::ToggleReasoning).unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, json!({"event": "toggle_reasoning"}));
    }

    #[test]
    fn decodes_server_reply_with_sender() {
        let event =
            decode_frame(r#"{"event":"receive_message","data":{"message":"4","sender":"bot"}}"#)
                .unwrap();
        assert_eq!(
            event,
            InboundEvent::ReceiveMessage {
                message: "4".into(),
                sender: Some(Sender::Bot),
            }
        );
    }

    #[test]
    fn decodes_ack() {
        let event = decode_frame(r#"{"event":"reasoning_toggled","data":{"enabled":true}}"#).unwrap();
        assert_eq!(event, InboundEvent::ReasoningToggled { enabled: true });
    }

    #[test]
    fn rejects_bad_frames() {
        assert!(matches!(decode_frame("not json"), Err(WireError::Malformed(_))));
        assert!(matches!(decode_frame(r#"{"data":{}}"#), Err(WireError::MissingEvent)));
        assert!(matches!(
            decode_frame(r#"{"event":"send_message","data":{"message":"x"}}"#),
            Err(WireError::UnknownEvent(name)) if name == "send_message"
        ));
        assert!(matches!(
            decode_frame(r#"{"event":"reasoning_toggled","data":{}}"#),
            Err(WireError::Malformed(_))
        ));
    }
}
