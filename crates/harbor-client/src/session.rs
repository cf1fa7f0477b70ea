//! Session synchronizer state machine.
//!
//! Orchestrates the connect lifecycle, login/rejoin handshake, logout,
//! outgoing event submission, and error surfacing. Owns the route machine
//! deciding which top-level view is active.
//!
//! # State Machine
//!
//! ```text
//!              connect ok            login ok
//! ┌────────────┐   +creds  ┌───────┐ ───────> ┌─────────┐
//! │ Connecting │──────────>│ Login │          │ Channel │
//! └────────────┘  (rejoin  └───────┘ <─────── └─────────┘
//!       ^          skips it)  ^       logout       │
//!       │ connect-error       └────────────────────┘
//!       │                                          │
//!       │            offline > 30s     ┌───────────────┐
//!       └─────────────────────────────>│ ServerOffline │
//!                 countdown expires <──└───────────────┘
//! ```
//!
//! Single-threaded and run-to-completion: every [`SessionEvent`] is fully
//! reduced before the next one is processed. Concurrent delivery of an ack
//! and a push for the same event is tolerated by the idempotent reducer, not
//! by locking.

use std::{collections::HashMap, ops::Sub, time::Duration};

use harbor_core::{ChannelAction, reduce};
use harbor_proto::{
    ChannelStatus, ClientChannel, ErrorCode, EventData,
    wire::{
        ChannelResponse, ClientRequest, Directory, LoginRequest, LogoutRequest, NewChannelName,
        RequestId, ResponseBody, SendEventRequest, ServerPush,
    },
};

use crate::{
    IdentityStorage, IdentityStore, OutboundRequest, SessionAction, SessionError, SessionEvent,
};

/// Continuous connect failure before the route becomes `ServerOffline`.
pub const OFFLINE_THRESHOLD: Duration = Duration::from_secs(30);

/// Visible countdown in `ServerOffline` before a forced reconnect.
pub const RELOAD_COUNTDOWN: Duration = Duration::from_secs(30);

/// Top-level view selector. Exactly one route is active at any time and it
/// fully determines which UI is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRoute {
    /// Waiting for the transport to establish a connection.
    Connecting,
    /// Connected, collecting credentials.
    Login,
    /// Joined a channel.
    Channel,
    /// Connection has been down long enough to assume the server is gone.
    ServerOffline,
}

/// What an in-flight request will do when its ack arrives.
#[derive(Debug, Clone)]
enum PendingKind {
    Login { user_name: String, channel_name: String, rejoin: bool },
    Logout,
    Send,
    NewChannelName,
    Directory,
}

impl PendingKind {
    /// Login/logout/send mutate server-side membership or history and are
    /// limited to one in flight; directory reads are not.
    fn is_mutating(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::Logout | Self::Send)
    }

    fn method(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Send => "sendEvent",
            Self::NewChannelName => "getNewChannelName",
            Self::Directory => "directory",
        }
    }
}

/// Client session state machine.
///
/// Sans-IO: consumes [`SessionEvent`]s, produces [`SessionAction`]s. The
/// injected [`IdentityStore`] is the only durable state; everything else is
/// rebuilt from the server on reconnect.
#[derive(Debug)]
pub struct Session<S, I = std::time::Instant> {
    identity: IdentityStore<S>,
    route: SessionRoute,
    channel: Option<ClientChannel>,
    directory: Vec<ChannelStatus>,
    last_error: Option<ErrorCode>,
    pending: HashMap<RequestId, PendingKind>,
    next_request_id: u64,
    connected: bool,
    offline_since: Option<I>,
}

impl<S, I> Session<S, I>
where
    S: IdentityStorage,
    I: Copy + Sub<Output = Duration>,
{
    /// Create a session around an injected identity store.
    ///
    /// Initial route is [`SessionRoute::Connecting`].
    pub fn new(identity: IdentityStore<S>) -> Self {
        Self {
            identity,
            route: SessionRoute::Connecting,
            channel: None,
            directory: Vec::new(),
            last_error: None,
            pending: HashMap::new(),
            next_request_id: 0,
            connected: false,
            offline_since: None,
        }
    }

    /// Process one event and return the resulting actions.
    ///
    /// # Errors
    ///
    /// [`SessionError::RequestPending`] when a login/logout/send intent
    /// arrives while another mutating request is still in flight.
    pub fn handle(&mut self, event: SessionEvent<I>) -> Result<Vec<SessionAction>, SessionError> {
        let mut actions = Vec::new();

        match event {
            SessionEvent::Connected => self.on_connected(&mut actions),
            SessionEvent::ConnectError | SessionEvent::Disconnected => {
                self.on_connection_lost(&mut actions);
            },
            SessionEvent::Tick { now } => self.on_tick(now, &mut actions),
            SessionEvent::Ack { id, result } => self.on_ack(id, result.into_result(), &mut actions),
            SessionEvent::AckFailed { id } => self.on_ack_failed(id, &mut actions),
            SessionEvent::Push(push) => self.on_push(push, &mut actions),
            SessionEvent::Login { user_name, channel_name } => {
                self.on_login(user_name, channel_name, false, &mut actions)?;
            },
            SessionEvent::Logout => self.on_logout(&mut actions)?,
            SessionEvent::SendEvent(data) => self.on_send(data, &mut actions)?,
            SessionEvent::RequestNewChannelName => {
                self.issue(ClientRequest::GetNewChannelName, PendingKind::NewChannelName, &mut actions);
            },
            SessionEvent::RefreshDirectory => {
                self.issue(ClientRequest::Directory, PendingKind::Directory, &mut actions);
            },
        }

        Ok(actions)
    }

    /// Current route.
    pub fn route(&self) -> SessionRoute {
        self.route
    }

    /// Server-confirmed channel state, if joined.
    pub fn channel(&self) -> Option<&ClientChannel> {
        self.channel.as_ref()
    }

    /// Last surfaced server rejection, if any.
    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }

    /// Cached channel directory for the login view.
    pub fn directory(&self) -> &[ChannelStatus] {
        &self.directory
    }

    /// Stored user name; empty when never logged in.
    pub fn user_name(&self) -> String {
        self.identity.user_name()
    }

    /// Seconds left on the server-offline countdown, if it is running.
    pub fn offline_seconds_left(&self, now: I) -> Option<u64> {
        if self.route != SessionRoute::ServerOffline {
            return None;
        }
        let since = self.offline_since?;
        let deadline = OFFLINE_THRESHOLD + RELOAD_COUNTDOWN;
        let elapsed = now - since;
        Some(deadline.saturating_sub(elapsed).as_secs())
    }

    fn on_connected(&mut self, actions: &mut Vec<SessionAction>) {
        self.connected = true;
        self.offline_since = None;

        // Reconnect invalidates whatever was in flight; acks will not come.
        self.pending.clear();

        self.issue(ClientRequest::Directory, PendingKind::Directory, actions);

        let user_name = self.identity.user_name();
        let channel_name = self.identity.channel_name();
        if !user_name.is_empty() && !channel_name.is_empty() {
            tracing::info!(user = %user_name, channel = %channel_name, "attempting rejoin");
            let request = ClientRequest::Login(LoginRequest {
                channel: channel_name.clone(),
                user: harbor_proto::User {
                    name: user_name.clone(),
                    session_id: self.identity.session_id(),
                },
            });
            self.issue(request, PendingKind::Login { user_name, channel_name, rejoin: true }, actions);
        } else {
            self.set_route(SessionRoute::Login, actions);
        }
    }

    fn on_connection_lost(&mut self, actions: &mut Vec<SessionAction>) {
        self.connected = false;
        self.pending.clear();
        if self.route != SessionRoute::ServerOffline {
            self.set_route(SessionRoute::Connecting, actions);
        }
    }

    fn on_tick(&mut self, now: I, actions: &mut Vec<SessionAction>) {
        if self.connected {
            return;
        }

        let Some(since) = self.offline_since else {
            self.offline_since = Some(now);
            return;
        };

        let elapsed = now - since;
        if self.route != SessionRoute::ServerOffline && elapsed >= OFFLINE_THRESHOLD {
            self.set_route(SessionRoute::ServerOffline, actions);
        }
        if elapsed >= OFFLINE_THRESHOLD + RELOAD_COUNTDOWN {
            self.offline_since = Some(now);
            self.set_route(SessionRoute::Connecting, actions);
            actions.push(SessionAction::ForceReconnect);
        }
    }

    fn on_login(
        &mut self,
        user_name: String,
        channel_name: String,
        rejoin: bool,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), SessionError> {
        if user_name.is_empty() || channel_name.is_empty() {
            return Ok(());
        }
        self.check_single_flight()?;

        let request = ClientRequest::Login(LoginRequest {
            channel: channel_name.clone(),
            user: harbor_proto::User {
                name: user_name.clone(),
                session_id: self.identity.session_id(),
            },
        });
        self.issue(request, PendingKind::Login { user_name, channel_name, rejoin }, actions);
        Ok(())
    }

    fn on_logout(&mut self, actions: &mut Vec<SessionAction>) -> Result<(), SessionError> {
        let Some(channel) = &self.channel else {
            self.set_route(SessionRoute::Login, actions);
            return Ok(());
        };
        self.check_single_flight()?;

        let request = ClientRequest::Logout(LogoutRequest {
            channel: channel.name.clone(),
            user: self.identity.user(),
        });
        self.issue(request, PendingKind::Logout, actions);
        Ok(())
    }

    fn on_send(
        &mut self,
        data: EventData,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), SessionError> {
        let Some(channel) = &self.channel else {
            return Ok(());
        };
        self.check_single_flight()?;

        let request = ClientRequest::SendEvent(SendEventRequest {
            channel: channel.name.clone(),
            user: self.identity.user(),
            data,
        });
        self.issue(request, PendingKind::Send, actions);
        Ok(())
    }

    fn on_ack(
        &mut self,
        id: RequestId,
        result: Result<ResponseBody, harbor_proto::ErrorResponse>,
        actions: &mut Vec<SessionAction>,
    ) {
        let Some(kind) = self.pending.remove(&id) else {
            tracing::warn!(%id, "dropping ack for unknown request");
            return;
        };

        match kind {
            PendingKind::Login { user_name, channel_name, rejoin } => {
                self.on_login_ack(user_name, channel_name, rejoin, result, actions);
            },
            PendingKind::Logout => match result {
                Err(error) => self.last_error = Some(error.code),
                Ok(_) => {
                    self.identity.set_channel_name("");
                    self.channel = None;
                    self.last_error = None;
                    actions.push(SessionAction::ChannelChanged);
                    self.set_route(SessionRoute::Login, actions);
                },
            },
            PendingKind::Send => match result {
                Err(error) => self.last_error = Some(error.code),
                Ok(ResponseBody::Event(event)) => {
                    self.apply(ChannelAction::Event(event), actions);
                },
                Ok(other) => tracing::warn!(%id, ?other, "mismatched sendEvent ack body"),
            },
            PendingKind::NewChannelName => match result {
                Ok(ResponseBody::NewChannelName(NewChannelName { name })) => {
                    actions.push(SessionAction::NewChannelName(name));
                },
                other => tracing::warn!(%id, ?other, "mismatched getNewChannelName ack"),
            },
            PendingKind::Directory => match result {
                Ok(ResponseBody::Directory(Directory { channels })) => {
                    self.set_directory(channels, actions);
                },
                other => tracing::warn!(%id, ?other, "mismatched directory ack"),
            },
        }
    }

    fn on_login_ack(
        &mut self,
        user_name: String,
        channel_name: String,
        rejoin: bool,
        result: Result<ResponseBody, harbor_proto::ErrorResponse>,
        actions: &mut Vec<SessionAction>,
    ) {
        match result {
            Err(error) => {
                if rejoin {
                    tracing::warn!(code = ?error.code, "rejoin rejected");
                }
                self.last_error = Some(error.code);
                self.set_route(SessionRoute::Login, actions);
            },
            Ok(ResponseBody::Channel(ChannelResponse { channel: Some(snapshot) })) => {
                self.identity.set_user_name(&user_name);
                self.identity.set_channel_name(&channel_name);
                self.apply(ChannelAction::Snapshot(snapshot), actions);
                // A rejoin snapshot can match the kept state exactly, so the
                // reducer diff alone must not be what clears the error.
                self.last_error = None;
                self.set_route(SessionRoute::Channel, actions);
            },
            Ok(ResponseBody::Channel(ChannelResponse { channel: None })) => {
                // Join was not performed; treated as failure without a code.
                self.set_route(SessionRoute::Login, actions);
            },
            Ok(other) => {
                tracing::warn!(?other, "mismatched login ack body");
                self.set_route(SessionRoute::Login, actions);
            },
        }
    }

    fn on_ack_failed(&mut self, id: RequestId, actions: &mut Vec<SessionAction>) {
        let Some(kind) = self.pending.remove(&id) else {
            return;
        };
        tracing::warn!(%id, method = kind.method(), "request failed in transport");
        actions.push(SessionAction::RequestFailed { method: kind.method() });
        if matches!(kind, PendingKind::Login { .. }) {
            self.set_route(SessionRoute::Login, actions);
        }
    }

    fn on_push(&mut self, push: ServerPush, actions: &mut Vec<SessionAction>) {
        match push {
            ServerPush::ChannelEvent(event) => self.apply(ChannelAction::Event(event), actions),
            ServerPush::ChannelLogin { channel } => {
                self.apply(ChannelAction::Snapshot(channel), actions);
            },
            ServerPush::ChannelLogout { channel: Some(channel) } => {
                self.apply(ChannelAction::Snapshot(channel), actions);
            },
            ServerPush::ChannelLogout { channel: None } => {},
            ServerPush::Directory { channels } => self.set_directory(channels, actions),
        }
    }

    /// Run the reducer and surface a change notification. A channel change
    /// also clears the stale error from a prior attempt.
    fn apply(&mut self, action: ChannelAction, actions: &mut Vec<SessionAction>) {
        let previous = self.channel.clone();
        self.channel = reduce(self.channel.take(), action);
        if self.channel != previous {
            self.last_error = None;
            actions.push(SessionAction::ChannelChanged);
        }
    }

    fn set_directory(&mut self, channels: Vec<ChannelStatus>, actions: &mut Vec<SessionAction>) {
        if self.directory != channels {
            self.directory = channels;
            actions.push(SessionAction::DirectoryChanged);
        }
    }

    fn set_route(&mut self, route: SessionRoute, actions: &mut Vec<SessionAction>) {
        if self.route != route {
            tracing::info!(from = ?self.route, to = ?route, "route transition");
            self.route = route;
            actions.push(SessionAction::RouteChanged(route));
        }
    }

    fn check_single_flight(&self) -> Result<(), SessionError> {
        match self.pending.values().find(|kind| kind.is_mutating()) {
            Some(kind) => Err(SessionError::RequestPending { pending: kind.method() }),
            None => Ok(()),
        }
    }

    fn issue(
        &mut self,
        request: ClientRequest,
        kind: PendingKind,
        actions: &mut Vec<SessionAction>,
    ) {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        tracing::debug!(%id, method = request.method(), "issuing request");
        self.pending.insert(id, kind);
        actions.push(SessionAction::Request(OutboundRequest { id, request }));
    }
}
