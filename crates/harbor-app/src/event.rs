//! Application input events.
//!
//! [`AppEvent`] is the full set of inputs that drive the [`crate::App`] state
//! machine. Events originate from two sources: user interaction and system
//! ticks, and session notifications translated by the [`crate::Bridge`].

use harbor_client::SessionRoute;
use harbor_proto::{ChannelStatus, ClientChannel, ErrorCode};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The active route changed.
    RouteChanged(SessionRoute),

    /// The channel state changed.
    ChannelChanged {
        /// Fresh server-confirmed channel state, if joined.
        channel: Option<ClientChannel>,
        /// Current stored user name (for own-message highlighting).
        user_name: String,
    },

    /// The channel directory changed.
    DirectoryChanged(Vec<ChannelStatus>),

    /// The surfaced server rejection changed.
    ErrorChanged(Option<ErrorCode>),

    /// A generated channel name arrived for the login form.
    NewChannelName(String),

    /// Seconds left on the server-offline countdown, `None` once it stops.
    OfflineCountdown(Option<u64>),

    /// The session asked for a fresh connection attempt.
    Reconnect,

    /// Non-fatal error to show in the status line.
    Error {
        /// Error description.
        message: String,
    },
}
