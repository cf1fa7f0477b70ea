//! End-to-end scenario harness.
//!
//! Wires [`App`], [`Bridge`], and [`SimServer`] together the way the runtime
//! does in production, but synchronously: every step settles completely
//! before the next one, and time only moves via [`Scenario::advance`].
//! Tests express user behavior (type, submit, wait) and assert on App state.

use std::time::{Duration, Instant};

use harbor_app::{App, AppAction, Bridge, ServerMessage};
use harbor_client::{IdentityStore, MemoryStorage};
use harbor_proto::wire::{ClientFrame, ServerFrame};

use crate::SimServer;

/// A single client driving a deterministic server.
pub struct Scenario {
    /// The UI state machine under test.
    pub app: App,
    bridge: Bridge<MemoryStorage, Instant>,
    server: SimServer,
    base: Instant,
    elapsed: Duration,
    online: bool,
    quit: bool,
    reconnects: u32,
}

impl Scenario {
    /// Create a scenario with a seeded server. The client starts
    /// disconnected.
    pub fn new(seed: u64) -> Self {
        Self {
            app: App::new(),
            bridge: Bridge::new(IdentityStore::new(MemoryStorage::new())),
            server: SimServer::with_seed(seed),
            base: Instant::now(),
            elapsed: Duration::ZERO,
            online: true,
            quit: false,
            reconnects: 0,
        }
    }

    /// Deliver a successful connection to the client and settle.
    pub fn connect(&mut self) {
        self.online = true;
        self.deliver(ServerMessage::Connected);
    }

    /// Drop the connection; subsequent requests go nowhere.
    pub fn disconnect(&mut self) {
        self.online = false;
        self.deliver(ServerMessage::Disconnected);
    }

    /// Submit the login form.
    pub fn login(&mut self, user_name: &str, channel_name: &str) {
        let actions = self.app.login(user_name, channel_name);
        self.apply(actions);
    }

    /// Send a chat message.
    pub fn send_message(&mut self, text: &str) {
        let actions = self.app.send_message(text);
        self.apply(actions);
    }

    /// Leave the current channel.
    pub fn logout(&mut self) {
        let actions = self.app.logout();
        self.apply(actions);
    }

    /// Advance virtual time and deliver a tick.
    pub fn advance(&mut self, duration: Duration) {
        self.elapsed += duration;
        let events = self.bridge.handle_tick(self.base + self.elapsed);
        let mut actions = Vec::new();
        for event in events {
            actions.extend(self.app.handle(event));
        }
        self.apply(actions);
    }

    /// Times the session demanded a fresh connection attempt.
    pub fn reconnect_requests(&self) -> u32 {
        self.reconnects
    }

    /// Whether the app asked to quit.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Server-side assertion hook.
    pub fn server(&self) -> &SimServer {
        &self.server
    }

    /// Deliver a raw server message (for out-of-order and duplicate frames).
    pub fn deliver(&mut self, message: ServerMessage) {
        let events = self.bridge.handle_server(message);
        let mut actions = Vec::new();
        for event in events {
            actions.extend(self.app.handle(event));
        }
        self.apply(actions);
    }

    /// Deliver a wire frame as the transport would.
    pub fn deliver_frame(&mut self, frame: ServerFrame) {
        let message = match frame {
            ServerFrame::Ack { id, result } => ServerMessage::Ack { id, result },
            ServerFrame::Push { push } => ServerMessage::Push(push),
        };
        self.deliver(message);
    }

    /// Process app actions, pumping requests through the server until
    /// everything settles.
    fn apply(&mut self, initial: Vec<AppAction>) {
        let mut pending = initial;

        loop {
            pending.extend(self.pump());
            if pending.is_empty() {
                break;
            }

            let actions = std::mem::take(&mut pending);
            for action in actions {
                match action {
                    AppAction::Render => {},
                    AppAction::Quit => self.quit = true,
                    AppAction::Connect => {
                        self.reconnects += 1;
                        // A forced reconnect succeeds if the server is up.
                        if self.online {
                            let events = self.bridge.handle_server(ServerMessage::Connected);
                            for event in events {
                                pending.extend(self.app.handle(event));
                            }
                        }
                    },
                    other => {
                        let events = self.bridge.process_app_action(other);
                        for event in events {
                            pending.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
    }

    /// Move queued requests to the server and its replies back, returning the
    /// resulting app actions.
    fn pump(&mut self) -> Vec<AppAction> {
        let mut actions = Vec::new();

        loop {
            let outgoing = self.bridge.take_outgoing();
            if outgoing.is_empty() {
                break;
            }

            for request in outgoing {
                if !self.online {
                    // The transport would never deliver this; report failure.
                    let id = request.id;
                    let events =
                        self.bridge.handle_server(ServerMessage::AckFailed { id });
                    for event in events {
                        actions.extend(self.app.handle(event));
                    }
                    continue;
                }

                let frame = ClientFrame { id: request.id, request: request.request };
                for reply in self.server.handle(frame) {
                    let message = match reply {
                        ServerFrame::Ack { id, result } => ServerMessage::Ack { id, result },
                        ServerFrame::Push { push } => ServerMessage::Push(push),
                    };
                    let events = self.bridge.handle_server(message);
                    for event in events {
                        actions.extend(self.app.handle(event));
                    }
                }
            }
        }

        actions
    }
}
