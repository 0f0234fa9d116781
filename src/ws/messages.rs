//! WebSocket message types: envelope, commands, and outbound payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::prediction::{PredictionInput, PredictionSlot};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a message stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds a server event with a fresh id.
    #[must_use]
    pub fn event(payload: serde_json::Value) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload)
    }

    /// Builds an error reply.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({
                "code": code,
                "message": message.into(),
            }),
        )
    }

    /// Serializes the envelope.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket, carried in the payload
/// of a [`WsMessageType::Command`] message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Follow profile events of the given users. Only the session's own
    /// user may be followed.
    Subscribe {
        /// User IDs to follow.
        user_ids: Vec<String>,
    },
    /// Stop following the given users.
    Unsubscribe {
        /// User IDs to drop.
        user_ids: Vec<String>,
    },
    /// Re-run the auth/subscription gate.
    RecheckGate,
    /// Run a prediction and stream the slots back one by one.
    Predict {
        /// Prediction input, same shape as the REST body.
        #[serde(default)]
        input: PredictionInput,
    },
}

/// Payload of one streamed prediction slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotPayload<'a> {
    /// Position of the slot, from 0.
    pub index: usize,
    /// Number of slots in the batch.
    pub total: usize,
    /// The slot itself.
    pub slot: &'a PredictionSlot,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_subscribe_command() {
        let json = serde_json::json!({"command": "subscribe", "user_ids": ["abc"]});
        let Ok(WsCommand::Subscribe { user_ids }) = serde_json::from_value::<WsCommand>(json) else {
            panic!("expected subscribe");
        };
        assert_eq!(user_ids, vec!["abc".to_string()]);
    }

    #[test]
    fn parses_unit_and_predict_commands() {
        let recheck = serde_json::from_value::<WsCommand>(serde_json::json!({"command": "recheck_gate"}));
        assert!(matches!(recheck, Ok(WsCommand::RecheckGate)));

        let predict = serde_json::from_value::<WsCommand>(serde_json::json!({
            "command": "predict",
            "input": {"date": "2025-01-01", "records": []}
        }));
        let Ok(WsCommand::Predict { input }) = predict else {
            panic!("expected predict");
        };
        assert_eq!(input.date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn error_envelope_shape() {
        let msg = WsMessage::error("42", 404, "unknown command");
        let Ok(value) = serde_json::to_value(&msg) else {
            panic!("serializable");
        };
        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("error"));
        assert_eq!(value.get("id").and_then(|v| v.as_str()), Some("42"));
        assert_eq!(value.pointer("/payload/code").and_then(|v| v.as_u64()), Some(404));
    }
}
