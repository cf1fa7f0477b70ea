//! Session events and actions.

use harbor_proto::{
    EventData,
    wire::{AckResult, ClientRequest, RequestId, ServerPush},
};

use crate::SessionRoute;

/// Inputs the caller feeds into the session state machine.
///
/// The caller is responsible for:
/// - Forwarding transport lifecycle signals and server frames.
/// - Driving time forward via ticks (offline countdown).
/// - Forwarding user intents (login, logout, send).
///
/// Generic over `I` (instant type) to support both production time and
/// simulated time in tests.
#[derive(Debug, Clone)]
pub enum SessionEvent<I = std::time::Instant> {
    /// Transport completed a connection handshake.
    Connected,
    /// Transport failed a connection attempt; it keeps retrying on its own.
    ConnectError,
    /// An established connection dropped.
    Disconnected,
    /// Periodic tick for offline-countdown processing.
    Tick {
        /// Current time from the environment.
        now: I,
    },
    /// Acknowledgement for a previously issued request.
    Ack {
        /// Correlation id from the request.
        id: RequestId,
        /// Outcome.
        result: AckResult,
    },
    /// The transport gave up on a request (timeout or rejection).
    AckFailed {
        /// Correlation id of the failed request.
        id: RequestId,
    },
    /// Unsolicited server push.
    Push(ServerPush),

    /// Caller intent: join a channel. Empty fields make this a no-op.
    Login {
        /// Display name to join as.
        user_name: String,
        /// Channel to join.
        channel_name: String,
    },
    /// Caller intent: leave the current channel.
    Logout,
    /// Caller intent: submit an event to the current channel. No-op without
    /// an active channel; the event appears only once the server echoes it.
    SendEvent(EventData),
    /// Caller intent: ask the server for an unused channel name.
    RequestNewChannelName,
    /// Caller intent: refetch the channel directory.
    RefreshDirectory,
}

/// A request handed to the driver for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Correlation id the ack must echo.
    pub id: RequestId,
    /// The request payload.
    pub request: ClientRequest,
}

/// Instructions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Send this request over the transport.
    Request(OutboundRequest),
    /// The active route changed; exactly one route is active at a time.
    RouteChanged(SessionRoute),
    /// The channel state changed; observers should re-derive their views.
    ChannelChanged,
    /// The channel directory changed.
    DirectoryChanged,
    /// A generated channel name arrived.
    NewChannelName(String),
    /// A request could not be delivered; non-fatal, reportable.
    RequestFailed {
        /// Wire method name of the failed request.
        method: &'static str,
    },
    /// The offline countdown expired; the driver should tear down and retry
    /// the connection from scratch.
    ForceReconnect,
}
