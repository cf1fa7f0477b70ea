//! Channel state and user identity value types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ChannelEvent;

/// Actor identity sent with every server request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Chosen display name.
    pub name: String,
    /// Stable per-session id.
    pub session_id: Uuid,
}

/// Authoritative channel state as last confirmed by the server.
///
/// `events` is kept time-sorted and free of duplicate ids by the client-side
/// reducer; a snapshot received from the server is merged field-wise, never
/// swapped in wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientChannel {
    /// Channel name.
    pub name: String,
    /// Names of currently joined users, in server order.
    pub users: Vec<String>,
    /// Ordered event history.
    pub events: Vec<ChannelEvent>,
}

impl ClientChannel {
    /// Empty channel with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), users: Vec::new(), events: Vec::new() }
    }
}

/// Directory entry for the pre-login channel picker.
///
/// Ephemeral; refetched on demand and never merged into channel state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatus {
    /// Channel name.
    pub name: String,
    /// Number of users currently joined.
    pub users_count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_session_id_camel_case() {
        let user = User { name: "ana".into(), session_id: Uuid::nil() };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "ana",
                "sessionId": "00000000-0000-0000-0000-000000000000"
            })
        );
    }

    #[test]
    fn channel_status_uses_users_count_field() {
        let status: ChannelStatus =
            serde_json::from_str(r#"{"name":"lobby","usersCount":3}"#).unwrap();
        assert_eq!(status.users_count, 3);
    }
}
