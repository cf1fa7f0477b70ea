//! Property tests over the full client pipeline.
//!
//! Random push sequences and user behavior must never break the channel
//! invariants: events sorted by time, ids unique, and state only ever
//! reflecting the joined channel.

use std::{collections::HashSet, time::Duration};

use harbor_app::ServerMessage;
use harbor_harness::Scenario;
use harbor_proto::{ChannelEvent, EventData, wire::ServerPush};
use proptest::prelude::*;

fn push_event() -> impl Strategy<Value = ChannelEvent> {
    (
        0u32..8,
        0i64..2_000_000_000_000,
        prop_oneof![Just("lobby".to_string()), Just("elsewhere".to_string())],
        ".{0,12}",
    )
        .prop_map(|(id, time, channel, message)| ChannelEvent {
            id: format!("p-{id}"),
            channel,
            user: "bob".into(),
            time,
            data: EventData::Message { message },
        })
}

#[derive(Debug, Clone)]
enum Op {
    Push(ChannelEvent),
    Advance(u64),
    Disconnect,
    Connect,
    SendMessage(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => push_event().prop_map(Op::Push),
        2 => (0u64..40).prop_map(Op::Advance),
        1 => Just(Op::Disconnect),
        1 => Just(Op::Connect),
        2 => ".{1,12}".prop_map(Op::SendMessage),
    ]
}

fn assert_invariants(s: &Scenario) {
    let Some(channel) = s.app.channel() else {
        return;
    };

    let mut ids = HashSet::new();
    for event in &channel.events {
        assert!(ids.insert(&event.id), "duplicate event id {}", event.id);
        assert_eq!(event.channel, channel.name, "foreign event leaked into state");
    }

    let times: Vec<i64> = channel.events.iter().map(|e| e.time).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]), "events out of order: {times:?}");
}

proptest! {
    #[test]
    fn random_pushes_keep_channel_invariants(events in prop::collection::vec(push_event(), 0..32)) {
        let mut s = Scenario::new(11);
        s.connect();
        s.login("ana", "lobby");

        for event in events {
            s.deliver(ServerMessage::Push(ServerPush::ChannelEvent(event)));
            assert_invariants(&s);
        }
    }

    #[test]
    fn foreign_pushes_never_change_state(events in prop::collection::vec(push_event(), 0..32)) {
        let mut s = Scenario::new(11);
        s.connect();
        s.login("ana", "lobby");
        let before = s.app.channel().cloned();

        for mut event in events {
            event.channel = "elsewhere".into();
            s.deliver(ServerMessage::Push(ServerPush::ChannelEvent(event)));
        }

        prop_assert_eq!(s.app.channel().cloned(), before);
    }

    #[test]
    fn arbitrary_op_sequences_never_panic(ops in prop::collection::vec(op(), 0..48)) {
        let mut s = Scenario::new(11);
        s.connect();
        s.login("ana", "lobby");

        for operation in ops {
            match operation {
                Op::Push(event) => {
                    s.deliver(ServerMessage::Push(ServerPush::ChannelEvent(event)));
                },
                Op::Advance(secs) => s.advance(Duration::from_secs(secs)),
                Op::Disconnect => s.disconnect(),
                Op::Connect => s.connect(),
                Op::SendMessage(text) => s.send_message(&text),
            }
            assert_invariants(&s);
        }
    }
}
