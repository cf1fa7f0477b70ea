//! TCP transport for the client.
//!
//! Newline-delimited JSON frames over a single TCP connection. This is a
//! thin I/O layer: it moves [`ClientFrame`]s out and [`ServerFrame`]s in,
//! retries the connection with its own backoff, and reports lifecycle
//! changes. All protocol logic stays in the sans-IO [`Session`](crate::Session).

use std::time::Duration;

use harbor_proto::wire::{ClientFrame, ServerFrame};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::mpsc,
};

/// Delay between reconnection attempts.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint address is unusable.
    #[error("invalid server address: {0}")]
    Address(String),

    /// The connection task is gone and frames can no longer be sent.
    #[error("connection closed")]
    Closed,
}

/// Connection lifecycle signals and inbound frames, in arrival order.
#[derive(Debug)]
pub enum TransportEvent {
    /// A connection attempt succeeded.
    Connected,
    /// A connection attempt failed; the transport will retry on its own.
    ConnectError,
    /// An established connection dropped; the transport will reconnect.
    Disconnected,
    /// A frame arrived from the server.
    Frame(ServerFrame),
}

/// Handle to a running connection task.
///
/// Frames are sent and received via channels; an internal task owns the
/// socket and the reconnect loop.
pub struct Connection {
    /// Send frames to the server.
    pub to_server: mpsc::Sender<ClientFrame>,
    /// Lifecycle events and inbound frames.
    pub events: mpsc::Receiver<TransportEvent>,
    abort_handle: tokio::task::AbortHandle,
}

impl Connection {
    /// Stop the connection task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Open a connection to a Harbor server.
///
/// Returns immediately; the actual connect happens in a background task that
/// keeps retrying with a fixed backoff. Outcomes arrive as
/// [`TransportEvent`]s.
pub fn connect(server_addr: &str) -> Result<Connection, TransportError> {
    if server_addr.trim().is_empty() {
        return Err(TransportError::Address("empty address".into()));
    }

    let (to_server_tx, to_server_rx) = mpsc::channel::<ClientFrame>(32);
    let (events_tx, events_rx) = mpsc::channel::<TransportEvent>(64);

    let handle = tokio::spawn(run_connection(server_addr.to_owned(), to_server_rx, events_tx));

    Ok(Connection {
        to_server: to_server_tx,
        events: events_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Connect/reconnect loop bridging the channels and the socket.
async fn run_connection(
    addr: String,
    mut to_server: mpsc::Receiver<ClientFrame>,
    events: mpsc::Sender<TransportEvent>,
) {
    loop {
        let stream = match TcpStream::connect(&addr).await {
            Ok(stream) => stream,
            Err(error) => {
                tracing::debug!(%addr, %error, "connect attempt failed");
                if events.send(TransportEvent::ConnectError).await.is_err() {
                    return;
                }
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            },
        };

        if events.send(TransportEvent::Connected).await.is_err() {
            return;
        }

        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        loop {
            tokio::select! {
                inbound = lines.next_line() => match inbound {
                    Ok(Some(line)) => match ServerFrame::decode(&line) {
                        Ok(frame) => {
                            if events.send(TransportEvent::Frame(frame)).await.is_err() {
                                return;
                            }
                        },
                        Err(error) => {
                            tracing::warn!(%error, "dropping malformed server frame");
                        },
                    },
                    Ok(None) | Err(_) => {
                        if events.send(TransportEvent::Disconnected).await.is_err() {
                            return;
                        }
                        break;
                    },
                },
                outbound = to_server.recv() => match outbound {
                    Some(frame) => {
                        let line = match frame.encode_line() {
                            Ok(line) => line,
                            Err(error) => {
                                tracing::warn!(%error, "dropping unencodable frame");
                                continue;
                            },
                        };
                        if write_half.write_all(line.as_bytes()).await.is_err() {
                            if events.send(TransportEvent::Disconnected).await.is_err() {
                                return;
                            }
                            break;
                        }
                    },
                    // Caller dropped the handle; shut down.
                    None => return,
                },
            }
        }

        tokio::time::sleep(RETRY_DELAY).await;
    }
}
