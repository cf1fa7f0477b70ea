//! Request/acknowledgement/push envelope.
//!
//! The transport is an opaque duplex connection: the client issues requests
//! that each receive exactly one acknowledgement, and the server pushes
//! unsolicited notifications. Frames are newline-delimited JSON. Requests
//! carry a client-assigned [`RequestId`] which the server echoes in the ack;
//! no ordering is guaranteed between acks and pushes.
//!
//! # Invariants
//!
//! - Every [`ClientRequest`] is acknowledged with either its named success
//!   payload or an [`ErrorResponse`], never both.
//! - Encoding a frame and decoding it back yields an equivalent value.

use serde::{Deserialize, Serialize};

use crate::{
    ChannelEvent, ChannelStatus, ClientChannel, ErrorResponse, EventData, ProtoError, User,
};

/// Client-assigned correlation id for request/ack matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Join a channel (or rejoin with stored credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Channel to join.
    pub channel: String,
    /// Acting user.
    pub user: User,
}

/// Leave the current channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Channel to leave.
    pub channel: String,
    /// Acting user.
    pub user: User,
}

/// Submit an event to the current channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEventRequest {
    /// Target channel.
    pub channel: String,
    /// Acting user.
    pub user: User,
    /// Event payload.
    pub data: EventData,
}

/// All requests the client can issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum ClientRequest {
    /// Join a channel.
    Login(LoginRequest),
    /// Leave a channel.
    Logout(LogoutRequest),
    /// Submit an event.
    SendEvent(SendEventRequest),
    /// Ask the server to generate an unused channel name.
    GetNewChannelName,
    /// Fetch the channel directory.
    Directory,
}

impl ClientRequest {
    /// Wire method name, for logging.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout(_) => "logout",
            Self::SendEvent(_) => "sendEvent",
            Self::GetNewChannelName => "getNewChannelName",
            Self::Directory => "directory",
        }
    }
}

/// Success payload of a login or logout acknowledgement.
///
/// `channel: None` on login means the join was not performed (treated as a
/// failure by the client); on logout it means the channel no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelResponse {
    /// Post-operation channel snapshot.
    pub channel: Option<ClientChannel>,
}

/// Success payload of a `getNewChannelName` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChannelName {
    /// Generated, currently unused channel name.
    pub name: String,
}

/// Success payload of a `directory` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    /// All channels currently known to the server.
    pub channels: Vec<ChannelStatus>,
}

/// Success payloads, one per request kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum ResponseBody {
    /// Login/logout result.
    Channel(ChannelResponse),
    /// Echo of the stored event for `sendEvent`.
    Event(ChannelEvent),
    /// Generated channel name.
    NewChannelName(NewChannelName),
    /// Channel directory listing.
    Directory(Directory),
}

/// Outcome carried by an acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "lowercase")]
pub enum AckResult {
    /// Request succeeded.
    Ok(ResponseBody),
    /// Request was rejected.
    Err(ErrorResponse),
}

impl AckResult {
    /// Convert to a standard `Result` for `?`-style handling.
    pub fn into_result(self) -> Result<ResponseBody, ErrorResponse> {
        match self {
            Self::Ok(body) => Ok(body),
            Self::Err(error) => Err(error),
        }
    }
}

/// Unsolicited server-to-client notifications.
///
/// Pushes for a channel are delivered in the order the server sent them;
/// nothing stronger is guaranteed relative to acknowledgements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerPush {
    /// New event in a channel.
    ChannelEvent(ChannelEvent),
    /// Another client joined: fresh membership snapshot.
    ChannelLogin {
        /// Post-login channel snapshot.
        channel: ClientChannel,
    },
    /// Another client left: fresh membership snapshot, `None` if the channel
    /// is now empty and was deleted.
    ChannelLogout {
        /// Post-logout channel snapshot.
        channel: Option<ClientChannel>,
    },
    /// Directory changed.
    Directory {
        /// All channels currently known to the server.
        channels: Vec<ChannelStatus>,
    },
}

/// Client-to-server frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFrame {
    /// Correlation id echoed by the ack.
    pub id: RequestId,
    /// The request itself.
    pub request: ClientRequest,
}

/// Server-to-client frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerFrame {
    /// Acknowledgement of a client request.
    Ack {
        /// Correlation id from the request.
        id: RequestId,
        /// Outcome.
        result: AckResult,
    },
    /// Unsolicited push.
    Push {
        /// The notification.
        push: ServerPush,
    },
}

impl ClientFrame {
    /// Encode as a single JSON line (newline included).
    pub fn encode_line(&self) -> Result<String, ProtoError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Decode from a JSON line.
    pub fn decode(line: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(line)?)
    }
}

impl ServerFrame {
    /// Encode as a single JSON line (newline included).
    pub fn encode_line(&self) -> Result<String, ProtoError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Decode from a JSON line.
    pub fn decode(line: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(line)?)
    }
}
