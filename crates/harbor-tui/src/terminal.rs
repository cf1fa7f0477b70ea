//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The server side is either a
//! TCP connection or the in-process demo server; both expose the same
//! channel shape.

use std::{
    io::{self, Stdout, stdout},
    time::Instant,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use harbor_app::{App, AppAction, AppEvent, Driver, KeyInput, ServerMessage};
use harbor_client::{
    OutboundRequest,
    transport::{self, Connection, TransportError, TransportEvent},
};
use harbor_proto::wire::{ClientFrame, ServerFrame};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{
    InputState,
    server::{self, ServerHandle},
    ui,
};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel send error.
    #[error("channel send error")]
    ChannelSend,

    /// No server connection is active.
    #[error("not connected")]
    NotConnected,
}

/// Where the driver connects.
pub enum Endpoint {
    /// TCP server at this address.
    Tcp(String),
    /// In-process demo server.
    InProcess,
}

/// Active server connection, TCP or in-process.
enum ServerLink {
    Tcp(Connection),
    InProcess(ServerHandle),
}

impl ServerLink {
    async fn send(&self, frame: ClientFrame) -> Result<(), TerminalError> {
        let sender = match self {
            Self::Tcp(conn) => &conn.to_server,
            Self::InProcess(handle) => &handle.to_server,
        };
        sender.send(frame).await.map_err(|_| TerminalError::ChannelSend)
    }

    fn try_recv(&mut self) -> Option<TransportEvent> {
        let events = match self {
            Self::Tcp(conn) => &mut conn.events,
            Self::InProcess(handle) => &mut handle.events,
        };
        events.try_recv().ok()
    }

    fn stop(&self) {
        match self {
            Self::Tcp(conn) => conn.stop(),
            Self::InProcess(handle) => handle.stop(),
        }
    }
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the server
/// link. Owns the input state for text editing.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    link: Option<ServerLink>,
    endpoint: Endpoint,
    connected: bool,
    input_state: InputState,
}

impl TerminalDriver {
    /// Create a new terminal driver.
    pub fn new(endpoint: Endpoint) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self {
            terminal,
            event_stream,
            link: None,
            endpoint,
            connected: false,
            input_state: InputState::new(),
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn translate(&mut self, event: TransportEvent) -> ServerMessage {
        match event {
            TransportEvent::Connected => {
                self.connected = true;
                ServerMessage::Connected
            },
            TransportEvent::ConnectError => {
                self.connected = false;
                ServerMessage::ConnectError
            },
            TransportEvent::Disconnected => {
                self.connected = false;
                ServerMessage::Disconnected
            },
            TransportEvent::Frame(ServerFrame::Ack { id, result }) => {
                ServerMessage::Ack { id, result }
            },
            TransportEvent::Frame(ServerFrame::Push { push }) => ServerMessage::Push(push),
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let timeout = tokio::time::Duration::from_millis(100);

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event.code) {
                            Some(key_input) => Ok(self.input_state.handle_key(key_input, app)),
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(cols, rows))) => {
                        Ok(app.handle(AppEvent::Resize(cols, rows)))
                    },
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => {
                Ok(app.handle(AppEvent::Tick))
            }
        }
    }

    async fn send_request(&mut self, request: OutboundRequest) -> Result<(), Self::Error> {
        let link = self.link.as_ref().ok_or(TerminalError::NotConnected)?;
        link.send(ClientFrame { id: request.id, request: request.request }).await
    }

    async fn recv_server(&mut self) -> Option<ServerMessage> {
        let event = self.link.as_mut()?.try_recv()?;
        Some(self.translate(event))
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        if let Some(link) = self.link.take() {
            link.stop();
        }
        self.connected = false;

        let link = match &self.endpoint {
            Endpoint::Tcp(addr) => ServerLink::Tcp(transport::connect(addr)?),
            Endpoint::InProcess => ServerLink::InProcess(server::spawn_server()),
        };
        self.link = Some(link);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(ref link) = self.link {
            link.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
