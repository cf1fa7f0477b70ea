//! Channel events and their payloads.

use serde::{Deserialize, Serialize};

/// System event kind carried by a [`EventData::System`] payload.
///
/// `Login` renders as "joined", `Logout` as "left".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    /// A user joined the channel.
    Login,
    /// A user left the channel.
    Logout,
}

/// Payload of a [`ChannelEvent`].
///
/// Explicit tagged union over the two upstream payload shapes. Serialization
/// is untagged so the wire keeps the structural form: a message payload is
/// `{"message": ...}`, a system payload is `{"system": "login"|"logout"}`.
/// The two shapes share no field names, so decoding is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventData {
    /// A chat message authored by a user.
    Message {
        /// Message text.
        message: String,
    },
    /// A presence notification generated by the server.
    System {
        /// What happened.
        system: SystemKind,
    },
}

/// Structural kind of an event, used for grouping adjacent lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Chat message line.
    Message,
    /// Presence/system line.
    System,
}

impl EventData {
    /// Structural kind of this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message { .. } => EventKind::Message,
            Self::System { .. } => EventKind::System,
        }
    }

    /// True if this is a chat message payload.
    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message { .. })
    }

    /// True if this is a system payload.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }
}

/// A single event in a channel's history.
///
/// Immutable once created. `id` is unique within a channel and `time` is
/// server-assigned epoch milliseconds; the client sorts by `time` and
/// deduplicates by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEvent {
    /// Server-assigned unique event id.
    pub id: String,
    /// Name of the channel the event belongs to.
    pub channel: String,
    /// Name of the user who caused the event.
    pub user: String,
    /// Server timestamp, epoch milliseconds.
    pub time: i64,
    /// Message or system payload.
    pub data: EventData,
}

impl ChannelEvent {
    /// Structural kind of this event.
    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn message_payload_wire_shape() {
        let data = EventData::Message { message: "hi".into() };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "hi" }));
    }

    #[test]
    fn system_payload_wire_shape() {
        let data = EventData::System { system: SystemKind::Login };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({ "system": "login" }));
    }

    #[test]
    fn structural_dispatch_on_decode() {
        let msg: EventData = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert!(msg.is_message());

        let sys: EventData = serde_json::from_str(r#"{"system":"logout"}"#).unwrap();
        assert_eq!(sys, EventData::System { system: SystemKind::Logout });
    }

    #[test]
    fn event_decodes_from_wire_form() {
        let event: ChannelEvent = serde_json::from_str(
            r#"{"id":"e1","channel":"lobby","user":"ana","time":1000,"data":{"message":"hi"}}"#,
        )
        .unwrap();
        assert_eq!(event.kind(), EventKind::Message);
        assert_eq!(event.user, "ana");
    }
}
