//! Application state machine.
//!
//! [`App`] manages the interactive state of the client completely decoupled
//! from I/O and protocol mechanics. It is a pure state machine: it consumes
//! [`crate::AppEvent`] inputs and produces [`crate::AppAction`] instructions
//! for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Mirrors the session's observable state (route, channel, directory,
//!   error) for rendering.
//! - Stores terminal dimensions to handle resize events.
//! - Keeps the transient status line and the suggested channel name for the
//!   login form.

use harbor_client::SessionRoute;
use harbor_proto::{ChannelStatus, ClientChannel, ErrorCode};

use crate::{AppAction, AppEvent};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Active top-level route.
    route: SessionRoute,
    /// Mirrored channel state. `None` outside the channel route.
    channel: Option<ClientChannel>,
    /// Channel directory for the login view.
    directory: Vec<ChannelStatus>,
    /// Own user name, for highlighting own messages.
    user_name: String,
    /// Surfaced server rejection for the login form.
    error: Option<ErrorCode>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Server-generated channel name suggestion for the login form.
    suggested_channel: Option<String>,
    /// Server-offline countdown, seconds.
    offline_seconds: Option<u64>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl App {
    /// Create a new App in the connecting route.
    pub fn new() -> Self {
        Self {
            route: SessionRoute::Connecting,
            channel: None,
            directory: Vec::new(),
            user_name: String::new(),
            error: None,
            status_message: None,
            suggested_channel: None,
            offline_seconds: None,
            terminal_size: (80, 24),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::RouteChanged(route) => {
                self.route = route;
                if route != SessionRoute::ServerOffline {
                    self.offline_seconds = None;
                }
                vec![AppAction::Render]
            },
            AppEvent::ChannelChanged { channel, user_name } => {
                self.channel = channel;
                self.user_name = user_name;
                vec![AppAction::Render]
            },
            AppEvent::DirectoryChanged(channels) => {
                self.directory = channels;
                vec![AppAction::Render]
            },
            AppEvent::ErrorChanged(error) => {
                self.error = error;
                vec![AppAction::Render]
            },
            AppEvent::NewChannelName(name) => {
                self.suggested_channel = Some(name);
                vec![AppAction::Render]
            },
            AppEvent::OfflineCountdown(seconds) => {
                self.offline_seconds = seconds;
                vec![AppAction::Render]
            },
            AppEvent::Reconnect => vec![AppAction::Connect, AppAction::Render],
            AppEvent::Error { message } => {
                self.status_message = Some(message);
                vec![AppAction::Render]
            },
        }
    }

    /// Submit the login form.
    ///
    /// Empty fields never produce a request; the user is told instead.
    pub fn login(&mut self, user_name: &str, channel_name: &str) -> Vec<AppAction> {
        if user_name.is_empty() || channel_name.is_empty() {
            self.status_message = Some("User name and channel name are required".into());
            return vec![AppAction::Render];
        }
        self.status_message = None;
        vec![
            AppAction::Login {
                user_name: user_name.to_owned(),
                channel_name: channel_name.to_owned(),
            },
            AppAction::Render,
        ]
    }

    /// Leave the current channel.
    pub fn logout(&self) -> Vec<AppAction> {
        vec![AppAction::Logout, AppAction::Render]
    }

    /// Send a chat message; empty input is ignored.
    pub fn send_message(&self, text: &str) -> Vec<AppAction> {
        if text.is_empty() {
            return vec![];
        }
        vec![AppAction::SendMessage { text: text.to_owned() }, AppAction::Render]
    }

    /// Ask for a generated channel name for the login form.
    pub fn request_new_channel_name(&self) -> Vec<AppAction> {
        vec![AppAction::RequestNewChannelName, AppAction::Render]
    }

    /// Refetch the channel directory.
    pub fn refresh_directory(&self) -> Vec<AppAction> {
        vec![AppAction::RefreshDirectory, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Active route.
    pub fn route(&self) -> SessionRoute {
        self.route
    }

    /// Mirrored channel state.
    pub fn channel(&self) -> Option<&ClientChannel> {
        self.channel.as_ref()
    }

    /// Channel directory for the login view.
    pub fn directory(&self) -> &[ChannelStatus] {
        &self.directory
    }

    /// Own user name; empty before the first login.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Surfaced server rejection, if any.
    pub fn error(&self) -> Option<ErrorCode> {
        self.error
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Server-suggested channel name for the login form.
    pub fn suggested_channel(&self) -> Option<&str> {
        self.suggested_channel.as_deref()
    }

    /// Seconds left on the server-offline countdown.
    pub fn offline_seconds(&self) -> Option<u64> {
        self.offline_seconds
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
