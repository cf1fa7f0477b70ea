//! In-process demo server.
//!
//! Speaks the Harbor wire protocol over mpsc channels instead of TCP, so the
//! TUI can run without a network server. One client, real protocol frames,
//! deterministic enough for manual testing.

use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

use harbor_client::transport::TransportEvent;
use harbor_proto::{
    ChannelEvent, ChannelStatus, ClientChannel, ErrorCode, ErrorResponse, EventData, SystemKind,
    User,
    wire::{
        AckResult, ChannelResponse, ClientFrame, ClientRequest, Directory, NewChannelName,
        ResponseBody, ServerFrame, ServerPush,
    },
};
use rand::seq::IndexedRandom;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Upper bound on users per channel.
const MAX_USERS: usize = 8;

/// Upper bound on user name length.
const MAX_NAME_LEN: usize = 16;

const ADJECTIVES: &[&str] = &[
    "amber", "brisk", "calm", "dusky", "eager", "foggy", "gentle", "hazy", "iron", "jolly",
    "keen", "lively", "misty", "noble", "quiet", "rusty", "salty", "tidal", "vivid", "windy",
];

const NOUNS: &[&str] = &[
    "anchor", "beacon", "cove", "dock", "estuary", "ferry", "gull", "harbor", "inlet", "jetty",
    "keel", "lighthouse", "mast", "narrows", "oar", "pier", "quay", "reef", "sound", "tide",
];

/// Handle to a running in-process server.
pub struct ServerHandle {
    /// Send frames to the server.
    pub to_server: mpsc::Sender<ClientFrame>,
    /// Lifecycle events and inbound frames, shaped like the TCP transport.
    pub events: mpsc::Receiver<TransportEvent>,
    abort_handle: tokio::task::AbortHandle,
}

impl ServerHandle {
    /// Stop the server task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Spawn an in-process demo server.
///
/// Returns a handle with the same channel shape as the TCP transport. The
/// server runs as a tokio task until dropped or stopped.
pub fn spawn_server() -> ServerHandle {
    let (client_tx, mut server_rx) = mpsc::channel::<ClientFrame>(32);
    let (events_tx, events_rx) = mpsc::channel::<TransportEvent>(64);

    let handle = tokio::spawn(async move {
        if events_tx.send(TransportEvent::Connected).await.is_err() {
            return;
        }

        let mut state = ServerState::default();
        while let Some(frame) = server_rx.recv().await {
            for reply in state.handle(frame) {
                if events_tx.send(TransportEvent::Frame(reply)).await.is_err() {
                    return;
                }
            }
        }
    });

    ServerHandle {
        to_server: client_tx,
        events: events_rx,
        abort_handle: handle.abort_handle(),
    }
}

#[derive(Debug, Default)]
struct Channel {
    users: Vec<User>,
    events: Vec<ChannelEvent>,
}

/// All server-side channel state.
#[derive(Debug, Default)]
struct ServerState {
    channels: HashMap<String, Channel>,
}

impl ServerState {
    /// Handle one client frame, producing the ack plus any pushes.
    fn handle(&mut self, frame: ClientFrame) -> Vec<ServerFrame> {
        let id = frame.id;
        match frame.request {
            ClientRequest::Login(req) => self.login(id, req),
            ClientRequest::Logout(req) => self.logout(id, req),
            ClientRequest::SendEvent(req) => self.send_event(id, req),
            ClientRequest::GetNewChannelName => {
                let name = self.unused_channel_name();
                vec![ack_ok(id, ResponseBody::NewChannelName(NewChannelName { name }))]
            },
            ClientRequest::Directory => {
                vec![ack_ok(id, ResponseBody::Directory(Directory { channels: self.directory() }))]
            },
        }
    }

    fn login(
        &mut self,
        id: harbor_proto::wire::RequestId,
        req: harbor_proto::wire::LoginRequest,
    ) -> Vec<ServerFrame> {
        if !valid_user_name(&req.user.name) {
            return vec![ack_err(id, ErrorCode::UsernameInvalid)];
        }

        let channel = self.channels.entry(req.channel.clone()).or_default();
        if channel.users.iter().any(|u| u.name == req.user.name) {
            return vec![ack_err(id, ErrorCode::UsernameUnavailable)];
        }
        if channel.users.len() >= MAX_USERS {
            return vec![ack_err(id, ErrorCode::MaxUsers)];
        }

        channel.users.push(req.user.clone());
        channel.events.push(system_event(&req.channel, &req.user.name, SystemKind::Login));

        let snapshot = snapshot(&req.channel, channel);
        vec![
            ack_ok(id, ResponseBody::Channel(ChannelResponse { channel: Some(snapshot.clone()) })),
            push(ServerPush::ChannelLogin { channel: snapshot }),
            push(ServerPush::Directory { channels: self.directory() }),
        ]
    }

    fn logout(
        &mut self,
        id: harbor_proto::wire::RequestId,
        req: harbor_proto::wire::LogoutRequest,
    ) -> Vec<ServerFrame> {
        let Some(channel) = self.channels.get_mut(&req.channel) else {
            return vec![ack_ok(id, ResponseBody::Channel(ChannelResponse { channel: None }))];
        };

        channel.users.retain(|u| u.session_id != req.user.session_id);
        channel.events.push(system_event(&req.channel, &req.user.name, SystemKind::Logout));

        let response = if channel.users.is_empty() {
            // Last user out deletes the channel.
            self.channels.remove(&req.channel);
            ChannelResponse { channel: None }
        } else {
            ChannelResponse { channel: Some(snapshot(&req.channel, channel)) }
        };

        vec![
            ack_ok(id, ResponseBody::Channel(response)),
            push(ServerPush::Directory { channels: self.directory() }),
        ]
    }

    fn send_event(
        &mut self,
        id: harbor_proto::wire::RequestId,
        req: harbor_proto::wire::SendEventRequest,
    ) -> Vec<ServerFrame> {
        let event = ChannelEvent {
            id: Uuid::new_v4().to_string(),
            channel: req.channel.clone(),
            user: req.user.name,
            time: epoch_ms(),
            data: req.data,
        };

        if let Some(channel) = self.channels.get_mut(&req.channel) {
            channel.events.push(event.clone());
        }

        vec![
            ack_ok(id, ResponseBody::Event(event.clone())),
            push(ServerPush::ChannelEvent(event)),
        ]
    }

    fn directory(&self) -> Vec<ChannelStatus> {
        let mut channels: Vec<ChannelStatus> = self
            .channels
            .iter()
            .map(|(name, channel)| ChannelStatus {
                name: name.clone(),
                users_count: channel.users.len() as u32,
            })
            .collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        channels
    }

    fn unused_channel_name(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let adjective = ADJECTIVES.choose(&mut rng).unwrap_or(&"quiet");
            let noun = NOUNS.choose(&mut rng).unwrap_or(&"harbor");
            let name = format!("{adjective}-{noun}");
            if !self.channels.contains_key(&name) {
                return name;
            }
        }
    }
}

fn valid_user_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn snapshot(name: &str, channel: &Channel) -> ClientChannel {
    ClientChannel {
        name: name.to_owned(),
        users: channel.users.iter().map(|u| u.name.clone()).collect(),
        events: channel.events.clone(),
    }
}

fn system_event(channel: &str, user: &str, kind: SystemKind) -> ChannelEvent {
    ChannelEvent {
        id: Uuid::new_v4().to_string(),
        channel: channel.to_owned(),
        user: user.to_owned(),
        time: epoch_ms(),
        data: EventData::System { system: kind },
    }
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

fn ack_ok(id: harbor_proto::wire::RequestId, body: ResponseBody) -> ServerFrame {
    ServerFrame::Ack { id, result: AckResult::Ok(body) }
}

fn ack_err(id: harbor_proto::wire::RequestId, code: ErrorCode) -> ServerFrame {
    ServerFrame::Ack { id, result: AckResult::Err(ErrorResponse::new(code)) }
}

fn push(push: ServerPush) -> ServerFrame {
    ServerFrame::Push { push }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use harbor_proto::wire::{LoginRequest, RequestId};

    use super::*;

    fn login_frame(id: u64, channel: &str, name: &str) -> ClientFrame {
        ClientFrame {
            id: RequestId(id),
            request: ClientRequest::Login(LoginRequest {
                channel: channel.into(),
                user: User { name: name.into(), session_id: Uuid::new_v4() },
            }),
        }
    }

    #[test]
    fn login_acks_with_snapshot_containing_join_event() {
        let mut state = ServerState::default();
        let replies = state.handle(login_frame(1, "lobby", "ana"));

        let ServerFrame::Ack { id, result } = &replies[0] else {
            panic!("expected ack first");
        };
        assert_eq!(*id, RequestId(1));
        let AckResult::Ok(ResponseBody::Channel(ChannelResponse { channel: Some(channel) })) =
            result
        else {
            panic!("expected channel snapshot");
        };
        assert_eq!(channel.users, vec!["ana".to_string()]);
        assert_eq!(channel.events.len(), 1);
    }

    #[test]
    fn duplicate_user_name_is_rejected() {
        let mut state = ServerState::default();
        let _ = state.handle(login_frame(1, "lobby", "ana"));
        let replies = state.handle(login_frame(2, "lobby", "ana"));

        let ServerFrame::Ack { result, .. } = &replies[0] else {
            panic!("expected ack");
        };
        assert!(matches!(result, AckResult::Err(e) if e.code == ErrorCode::UsernameUnavailable));
    }

    #[test]
    fn full_channel_is_rejected() {
        let mut state = ServerState::default();
        for i in 0..MAX_USERS as u64 {
            let _ = state.handle(login_frame(i, "lobby", &format!("user{i}")));
        }
        let replies = state.handle(login_frame(99, "lobby", "late"));

        let ServerFrame::Ack { result, .. } = &replies[0] else {
            panic!("expected ack");
        };
        assert!(matches!(result, AckResult::Err(e) if e.code == ErrorCode::MaxUsers));
    }

    #[test]
    fn last_logout_deletes_the_channel() {
        let mut state = ServerState::default();
        let session_id = Uuid::new_v4();
        let _ = state.handle(ClientFrame {
            id: RequestId(1),
            request: ClientRequest::Login(LoginRequest {
                channel: "lobby".into(),
                user: User { name: "ana".into(), session_id },
            }),
        });

        let replies = state.handle(ClientFrame {
            id: RequestId(2),
            request: ClientRequest::Logout(harbor_proto::wire::LogoutRequest {
                channel: "lobby".into(),
                user: User { name: "ana".into(), session_id },
            }),
        });

        let ServerFrame::Ack { result, .. } = &replies[0] else {
            panic!("expected ack");
        };
        assert!(matches!(
            result,
            AckResult::Ok(ResponseBody::Channel(ChannelResponse { channel: None }))
        ));
        assert!(state.channels.is_empty());
    }

    #[test]
    fn generated_channel_name_is_unused() {
        let mut state = ServerState::default();
        let _ = state.handle(login_frame(1, "amber-harbor", "ana"));
        let name = state.unused_channel_name();
        assert!(!state.channels.contains_key(&name));
    }

    #[test]
    fn invalid_user_names_are_rejected() {
        assert!(!valid_user_name(""));
        assert!(!valid_user_name("has space"));
        assert!(!valid_user_name(&"x".repeat(MAX_NAME_LEN + 1)));
        assert!(valid_user_name("ana-b_2"));
    }
}
