//! Fuzz target for the channel reducer
//!
//! Folds arbitrary action sequences into channel state and checks the
//! reducer invariants after every step:
//!
//! - `events` stays sorted ascending by `time`
//! - Event ids stay unique
//! - Events for a different channel never enter the state
//! - The reducer never panics

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use harbor_core::{ChannelAction, reduce};
use harbor_proto::{ChannelEvent, ClientChannel, EventData, SystemKind};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzAction {
    Snapshot { channel: ChannelChoice, users: Vec<String>, events: Vec<FuzzEvent> },
    Event(FuzzEvent),
}

#[derive(Debug, Arbitrary)]
struct FuzzEvent {
    id: u8,
    channel: ChannelChoice,
    time: i64,
    message: Option<String>,
}

// Constrained names so collisions and foreign channels actually occur.
#[derive(Debug, Arbitrary, Clone, Copy)]
enum ChannelChoice {
    Lobby,
    Other,
    Empty,
}

impl ChannelChoice {
    fn name(self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Other => "other",
            Self::Empty => "",
        }
    }
}

fn build_event(event: FuzzEvent) -> ChannelEvent {
    let data = match event.message {
        Some(message) => EventData::Message { message },
        None => EventData::System { system: SystemKind::Login },
    };
    ChannelEvent {
        id: format!("e-{}", event.id),
        channel: event.channel.name().to_owned(),
        user: "fuzz".to_owned(),
        time: event.time,
        data,
    }
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let mut state: Option<ClientChannel> = None;

    for action in actions {
        let action = match action {
            FuzzAction::Snapshot { channel, users, events } => {
                // Servers only ever snapshot a channel's own events.
                let events = events
                    .into_iter()
                    .map(|e| {
                        let mut event = build_event(e);
                        event.channel = channel.name().to_owned();
                        event
                    })
                    .collect();
                ChannelAction::Snapshot(ClientChannel {
                    name: channel.name().to_owned(),
                    users,
                    events,
                })
            },
            FuzzAction::Event(event) => ChannelAction::Event(build_event(event)),
        };

        state = reduce(state, action);

        if let Some(channel) = &state {
            let mut ids = HashSet::new();
            for event in &channel.events {
                assert!(ids.insert(&event.id), "duplicate event id {}", event.id);
                assert_eq!(event.channel, channel.name, "foreign event in state");
            }
            assert!(
                channel.events.windows(2).all(|w| w[0].time <= w[1].time),
                "events out of time order"
            );
        }
    }
});
