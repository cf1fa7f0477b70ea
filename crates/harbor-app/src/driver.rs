//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use harbor_client::OutboundRequest;
use harbor_proto::wire::{AckResult, RequestId, ServerPush};

use crate::{App, AppAction};

/// Everything the server side of the connection can deliver to the client,
/// including lifecycle signals synthesized by the transport.
#[derive(Debug)]
pub enum ServerMessage {
    /// A connection attempt succeeded.
    Connected,
    /// A connection attempt failed; the transport keeps retrying.
    ConnectError,
    /// An established connection dropped.
    Disconnected,
    /// Acknowledgement of a client request.
    Ack {
        /// Correlation id from the request.
        id: RequestId,
        /// Outcome.
        result: AckResult,
    },
    /// The transport gave up on a request.
    AckFailed {
        /// Correlation id of the failed request.
        id: RequestId,
    },
    /// Unsolicited push.
    Push(ServerPush),
}

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures the
/// same orchestration code runs in the production TUI and in simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, TCP or an in-process server for
///   the connection
/// - **Simulation**: injected messages and captured requests, no real I/O
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for the next input event and translate it into app actions.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Send a request to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or the send fails; the
    /// runtime reports it back to the session as a failed acknowledgement.
    fn send_request(
        &mut self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receive the next server message, or `None` if nothing is ready.
    fn recv_server(&mut self) -> impl Future<Output = Option<ServerMessage>> + Send;

    /// Start (or restart) the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot even be attempted; attempt
    /// outcomes arrive as [`ServerMessage`] lifecycle values.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Check if connected to the server.
    fn is_connected(&self) -> bool;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
