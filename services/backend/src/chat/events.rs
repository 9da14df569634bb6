//! Real-time event payloads
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

/// Sender tag on every relayed reply
pub const AI_SENDER: &str = "ai";

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    SendMessage(SendMessage),
}

/// Events the server emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    ReceiveMessage(ReceiveMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub message: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveMessage {
    pub sender: String,
    pub message: String,
}

impl ReceiveMessage {
    pub fn from_ai(message: impl Into<String>) -> Self {
        Self {
            sender: AI_SENDER.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_send_message_envelope() {
        let frame = json!({
            "event": "send_message",
            "data": { "message": "hello", "userId": "u1" }
        });

        let event: ClientEvent = serde_json::from_value(frame).unwrap();
        assert_eq!(
            event,
            ClientEvent::SendMessage(SendMessage {
                message: "hello".to_string(),
                user_id: "u1".to_string(),
            })
        );
    }

    #[test]
    fn encodes_receive_message_envelope() {
        let event = ServerEvent::ReceiveMessage(ReceiveMessage::from_ai("hi there"));

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "receive_message",
                "data": { "sender": "ai", "message": "hi there" }
            })
        );
    }

    #[test]
    fn unknown_events_are_rejected() {
        let frame = json!({ "event": "typing", "data": {} });
        assert!(serde_json::from_value::<ClientEvent>(frame).is_err());
    }
}
