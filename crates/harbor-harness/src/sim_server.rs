//! Deterministic in-memory chat server model.
//!
//! Implements the same request/ack/push contract as the real server, with a
//! logical millisecond clock and a seeded RNG so every run produces
//! byte-identical frames. Tests drive it synchronously: one client frame in,
//! the ack plus any pushes out.

use std::collections::HashMap;

use harbor_proto::{
    ChannelEvent, ChannelStatus, ClientChannel, ErrorCode, ErrorResponse, EventData, SystemKind,
    User,
    wire::{
        AckResult, ChannelResponse, ClientFrame, ClientRequest, Directory, LoginRequest,
        LogoutRequest, NewChannelName, RequestId, ResponseBody, SendEventRequest, ServerFrame,
        ServerPush,
    },
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound on users per channel.
pub const MAX_USERS: usize = 8;

/// Logical clock start, a fixed epoch so timestamps are reproducible.
const CLOCK_START_MS: i64 = 1_700_000_000_000;

/// Logical clock step per handled event.
const CLOCK_STEP_MS: i64 = 1_000;

const NAME_WORDS: &[&str] = &[
    "anchor", "beacon", "cove", "drift", "ember", "fathom", "gale", "haven", "isle", "jetty",
];

#[derive(Debug, Default)]
struct Channel {
    users: Vec<User>,
    events: Vec<ChannelEvent>,
}

/// Deterministic server model.
pub struct SimServer {
    channels: HashMap<String, Channel>,
    rng: ChaCha8Rng,
    clock_ms: i64,
    next_event: u64,
}

impl SimServer {
    /// Create a server with the given RNG seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            channels: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock_ms: CLOCK_START_MS,
            next_event: 0,
        }
    }

    /// Handle one client frame: the ack first, then any pushes.
    pub fn handle(&mut self, frame: ClientFrame) -> Vec<ServerFrame> {
        self.clock_ms += CLOCK_STEP_MS;
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

    /// Whether a channel currently exists.
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Users currently joined to a channel.
    pub fn users_in(&self, name: &str) -> Vec<String> {
        self.channels
            .get(name)
            .map(|c| c.users.iter().map(|u| u.name.clone()).collect())
            .unwrap_or_default()
    }

    fn login(&mut self, id: RequestId, req: LoginRequest) -> Vec<ServerFrame> {
        if req.user.name.is_empty() || req.user.name.len() > 16 {
            return vec![ack_err(id, ErrorCode::UsernameInvalid)];
        }

        let event = self.system_event(&req.channel, &req.user.name, SystemKind::Login);
        let channel = self.channels.entry(req.channel.clone()).or_default();
        if let Some(existing) = channel.users.iter().find(|u| u.name == req.user.name) {
            // Same session rejoining after a drop is not a name clash.
            if existing.session_id == req.user.session_id {
                let snapshot = snapshot(&req.channel, channel);
                return vec![ack_ok(
                    id,
                    ResponseBody::Channel(ChannelResponse { channel: Some(snapshot) }),
                )];
            }
            return vec![ack_err(id, ErrorCode::UsernameUnavailable)];
        }
        if channel.users.len() >= MAX_USERS {
            return vec![ack_err(id, ErrorCode::MaxUsers)];
        }

        channel.users.push(req.user);
        channel.events.push(event);

        let snapshot = snapshot(&req.channel, channel);
        vec![
            ack_ok(id, ResponseBody::Channel(ChannelResponse { channel: Some(snapshot.clone()) })),
            push(ServerPush::ChannelLogin { channel: snapshot }),
            push(ServerPush::Directory { channels: self.directory() }),
        ]
    }

    fn logout(&mut self, id: RequestId, req: LogoutRequest) -> Vec<ServerFrame> {
        let event = self.system_event(&req.channel, &req.user.name, SystemKind::Logout);
        let Some(channel) = self.channels.get_mut(&req.channel) else {
            return vec![ack_ok(id, ResponseBody::Channel(ChannelResponse { channel: None }))];
        };

        channel.users.retain(|u| u.session_id != req.user.session_id);
        channel.events.push(event);

        let response = if channel.users.is_empty() {
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

    fn send_event(&mut self, id: RequestId, req: SendEventRequest) -> Vec<ServerFrame> {
        let event = self.event(&req.channel, &req.user.name, req.data);

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

    fn unused_channel_name(&mut self) -> String {
        loop {
            let first = NAME_WORDS[self.rng.gen_range(0..NAME_WORDS.len())];
            let second = NAME_WORDS[self.rng.gen_range(0..NAME_WORDS.len())];
            let name = format!("{first}-{second}");
            if !self.channels.contains_key(&name) {
                return name;
            }
        }
    }

    fn event(&mut self, channel: &str, user: &str, data: EventData) -> ChannelEvent {
        let id = format!("evt-{}", self.next_event);
        self.next_event += 1;
        ChannelEvent {
            id,
            channel: channel.to_owned(),
            user: user.to_owned(),
            time: self.clock_ms,
            data,
        }
    }

    fn system_event(&mut self, channel: &str, user: &str, kind: SystemKind) -> ChannelEvent {
        self.event(channel, user, EventData::System { system: kind })
    }
}

fn snapshot(name: &str, channel: &Channel) -> ClientChannel {
    ClientChannel {
        name: name.to_owned(),
        users: channel.users.iter().map(|u| u.name.clone()).collect(),
        events: channel.events.clone(),
    }
}

fn ack_ok(id: RequestId, body: ResponseBody) -> ServerFrame {
    ServerFrame::Ack { id, result: AckResult::Ok(body) }
}

fn ack_err(id: RequestId, code: ErrorCode) -> ServerFrame {
    ServerFrame::Ack { id, result: AckResult::Err(ErrorResponse::new(code)) }
}

fn push(push: ServerPush) -> ServerFrame {
    ServerFrame::Push { push }
}
