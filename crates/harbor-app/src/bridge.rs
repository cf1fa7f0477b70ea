//! Session-to-Application translation layer.
//!
//! The [`Bridge`] wraps the sans-IO [`harbor_client::Session`] and adapts it
//! to the application lifecycle:
//!
//! - Converts high-level [`crate::AppAction`]s into session intents.
//! - Accumulates outgoing requests to be sent by the driver in the next I/O
//!   cycle.
//! - Interprets session actions and converts them into [`crate::AppEvent`]s
//!   to update the UI, tracking what has already been reported so the App
//!   only sees changes.

use std::{ops::Sub, time::Duration};

use harbor_client::{
    IdentityStorage, IdentityStore, OutboundRequest, Session, SessionAction, SessionEvent,
};
use harbor_proto::{ErrorCode, EventData};

use crate::{AppAction, AppEvent, ServerMessage};

/// Bridge between App and the session state machine.
///
/// Generic over the identity storage backend and the instant type so the
/// same code runs in production and simulation.
pub struct Bridge<S, I = std::time::Instant> {
    session: Session<S, I>,
    outgoing: Vec<OutboundRequest>,
    reported_error: Option<ErrorCode>,
    reported_countdown: Option<u64>,
}

impl<S, I> Bridge<S, I>
where
    S: IdentityStorage,
    I: Copy + Sub<Output = Duration>,
{
    /// Create a bridge around an injected identity store.
    pub fn new(identity: IdentityStore<S>) -> Self {
        Self {
            session: Session::new(identity),
            outgoing: Vec::new(),
            reported_error: None,
            reported_countdown: None,
        }
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::Login { user_name, channel_name } => {
                self.dispatch(SessionEvent::Login { user_name, channel_name })
            },
            AppAction::Logout => self.dispatch(SessionEvent::Logout),
            AppAction::SendMessage { text } => {
                self.dispatch(SessionEvent::SendEvent(EventData::Message { message: text }))
            },
            AppAction::RequestNewChannelName => {
                self.dispatch(SessionEvent::RequestNewChannelName)
            },
            AppAction::RefreshDirectory => self.dispatch(SessionEvent::RefreshDirectory),
            AppAction::Render | AppAction::Quit | AppAction::Connect => vec![],
        }
    }

    /// Handle a message from the server connection.
    pub fn handle_server(&mut self, message: ServerMessage) -> Vec<AppEvent> {
        let event = match message {
            ServerMessage::Connected => SessionEvent::Connected,
            ServerMessage::ConnectError => SessionEvent::ConnectError,
            ServerMessage::Disconnected => SessionEvent::Disconnected,
            ServerMessage::Ack { id, result } => SessionEvent::Ack { id, result },
            ServerMessage::AckFailed { id } => SessionEvent::AckFailed { id },
            ServerMessage::Push(push) => SessionEvent::Push(push),
        };
        self.dispatch(event)
    }

    /// Process a time tick (drives the offline countdown).
    pub fn handle_tick(&mut self, now: I) -> Vec<AppEvent> {
        let mut events = self.dispatch(SessionEvent::Tick { now });

        let countdown = self.session.offline_seconds_left(now);
        if countdown != self.reported_countdown {
            self.reported_countdown = countdown;
            events.push(AppEvent::OfflineCountdown(countdown));
        }
        events
    }

    /// Take pending outgoing requests.
    pub fn take_outgoing(&mut self) -> Vec<OutboundRequest> {
        std::mem::take(&mut self.outgoing)
    }

    fn dispatch(&mut self, event: SessionEvent<I>) -> Vec<AppEvent> {
        let mut events = match self.session.handle(event) {
            Ok(actions) => self.map_actions(actions),
            Err(error) => vec![AppEvent::Error { message: error.to_string() }],
        };

        // The error slot can change without a dedicated action (a rejected
        // login sets it alongside the route change); diff it here.
        let error = self.session.last_error();
        if error != self.reported_error {
            self.reported_error = error;
            events.push(AppEvent::ErrorChanged(error));
        }

        events
    }

    fn map_actions(&mut self, actions: Vec<SessionAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                SessionAction::Request(request) => self.outgoing.push(request),
                SessionAction::RouteChanged(route) => events.push(AppEvent::RouteChanged(route)),
                SessionAction::ChannelChanged => events.push(AppEvent::ChannelChanged {
                    channel: self.session.channel().cloned(),
                    user_name: self.session.user_name(),
                }),
                SessionAction::DirectoryChanged => {
                    events.push(AppEvent::DirectoryChanged(self.session.directory().to_vec()));
                },
                SessionAction::NewChannelName(name) => {
                    events.push(AppEvent::NewChannelName(name));
                },
                SessionAction::RequestFailed { method } => {
                    events.push(AppEvent::Error { message: format!("{method} request failed") });
                },
                SessionAction::ForceReconnect => events.push(AppEvent::Reconnect),
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use harbor_client::{MemoryStorage, SessionRoute};
    use harbor_proto::{
        ClientChannel, ErrorResponse,
        wire::{AckResult, ChannelResponse, ClientRequest, ResponseBody},
    };

    use super::*;

    type TestBridge = Bridge<MemoryStorage, std::time::Instant>;

    fn bridge() -> TestBridge {
        Bridge::new(IdentityStore::new(MemoryStorage::new()))
    }

    fn lobby() -> ClientChannel {
        ClientChannel { name: "lobby".into(), users: vec!["ana".into()], events: vec![] }
    }

    #[test]
    fn connect_produces_login_route_and_directory_request() {
        let mut b = bridge();
        let events = b.handle_server(ServerMessage::Connected);

        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::RouteChanged(SessionRoute::Login))));
        let outgoing = b.take_outgoing();
        assert!(outgoing.iter().any(|r| matches!(r.request, ClientRequest::Directory)));
    }

    #[test]
    fn login_action_queues_request() {
        let mut b = bridge();
        let _ = b.handle_server(ServerMessage::Connected);
        let _ = b.take_outgoing();

        let events = b.process_app_action(AppAction::Login {
            user_name: "ana".into(),
            channel_name: "lobby".into(),
        });

        assert!(events.is_empty());
        assert!(b
            .take_outgoing()
            .iter()
            .any(|r| matches!(r.request, ClientRequest::Login(_))));
    }

    #[test]
    fn successful_login_ack_reports_channel_and_route() {
        let mut b = bridge();
        let _ = b.handle_server(ServerMessage::Connected);
        let _ = b.take_outgoing();
        let _ = b.process_app_action(AppAction::Login {
            user_name: "ana".into(),
            channel_name: "lobby".into(),
        });
        let id = b.take_outgoing()[0].id;

        let events = b.handle_server(ServerMessage::Ack {
            id,
            result: AckResult::Ok(ResponseBody::Channel(ChannelResponse {
                channel: Some(lobby()),
            })),
        });

        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::ChannelChanged { channel: Some(_), .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::RouteChanged(SessionRoute::Channel))));
    }

    #[test]
    fn rejected_login_reports_error_change() {
        let mut b = bridge();
        let _ = b.handle_server(ServerMessage::Connected);
        let _ = b.take_outgoing();
        let _ = b.process_app_action(AppAction::Login {
            user_name: "ana".into(),
            channel_name: "full".into(),
        });
        let id = b.take_outgoing()[0].id;

        let events = b.handle_server(ServerMessage::Ack {
            id,
            result: AckResult::Err(ErrorResponse::new(harbor_proto::ErrorCode::MaxUsers)),
        });

        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::ErrorChanged(Some(harbor_proto::ErrorCode::MaxUsers))
        )));
    }

    #[test]
    fn second_login_while_pending_surfaces_status_error() {
        let mut b = bridge();
        let _ = b.handle_server(ServerMessage::Connected);
        let _ = b.process_app_action(AppAction::Login {
            user_name: "ana".into(),
            channel_name: "lobby".into(),
        });

        let events = b.process_app_action(AppAction::Login {
            user_name: "bob".into(),
            channel_name: "lobby".into(),
        });

        assert!(events.iter().any(|e| matches!(e, AppEvent::Error { .. })));
    }
}
