//! Property tests for the channel reducer.
//!
//! These encode the reducer's contract directly: idempotence per event id,
//! time ordering under any arrival order, channel isolation, and field-merge
//! behavior for snapshots.

#![allow(clippy::unwrap_used)]

use harbor_core::{ChannelAction, reduce};
use harbor_proto::{ChannelEvent, ClientChannel, EventData, SystemKind};
use proptest::prelude::*;

fn arb_event(channel: &'static str) -> impl Strategy<Value = ChannelEvent> {
    ("[a-f0-9]{8}", "[a-z]{1,8}", 0i64..10_000, prop::bool::ANY).prop_map(
        move |(id, user, time, system)| ChannelEvent {
            id,
            channel: channel.into(),
            user,
            time,
            data: if system {
                EventData::System { system: SystemKind::Login }
            } else {
                EventData::Message { message: "x".into() }
            },
        },
    )
}

fn lobby() -> ClientChannel {
    ClientChannel::new("lobby")
}

fn apply_all(events: Vec<ChannelEvent>) -> Option<ClientChannel> {
    events
        .into_iter()
        .fold(Some(lobby()), |state, event| reduce(state, ChannelAction::Event(event)))
}

proptest! {
    #[test]
    fn applying_an_event_twice_equals_once(
        prefix in prop::collection::vec(arb_event("lobby"), 0..12),
        event in arb_event("lobby"),
    ) {
        let base = apply_all(prefix);
        let once = reduce(base, ChannelAction::Event(event.clone()));
        let twice = reduce(once.clone(), ChannelAction::Event(event));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn history_is_always_time_sorted(events in prop::collection::vec(arb_event("lobby"), 0..24)) {
        let state = apply_all(events);
        let times: Vec<i64> =
            state.into_iter().flat_map(|c| c.events).map(|e| e.time).collect();
        prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn ids_are_unique_in_history(events in prop::collection::vec(arb_event("lobby"), 0..24)) {
        let state = apply_all(events);
        let ids: Vec<String> =
            state.into_iter().flat_map(|c| c.events).map(|e| e.id).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn foreign_events_never_change_state(
        ours in prop::collection::vec(arb_event("lobby"), 0..12),
        foreign in prop::collection::vec(arb_event("other"), 1..12),
    ) {
        let state = apply_all(ours);
        let after = foreign
            .into_iter()
            .fold(state.clone(), |s, event| reduce(s, ChannelAction::Event(event)));
        prop_assert_eq!(state, after);
    }

    #[test]
    fn snapshot_merge_keeps_events_and_takes_users(
        events in prop::collection::vec(arb_event("lobby"), 0..12),
        users in prop::collection::vec("[a-z]{1,8}", 0..6),
    ) {
        let state = apply_all(events);
        let event_count = state.as_ref().map_or(0, |c| c.events.len());

        let snapshot = ClientChannel { name: "lobby".into(), users: users.clone(), events: vec![] };
        let merged = reduce(state, ChannelAction::Snapshot(snapshot));

        let merged = merged.unwrap();
        prop_assert_eq!(merged.users, users);
        prop_assert!(merged.events.len() >= event_count);
    }
}
