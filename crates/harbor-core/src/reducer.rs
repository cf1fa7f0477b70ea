//! Channel state reducer.
//!
//! Pure merge function turning an incoming snapshot or event into the next
//! channel state. Both the acknowledgement of a locally sent event and the
//! corresponding server push funnel through here, so applying the same event
//! id twice must be a no-op.
//!
//! # Invariants
//!
//! - `events` is sorted ascending by `time`; equal timestamps keep arrival
//!   order (stable sort, no synthetic tiebreaker).
//! - Event ids are unique within `events`.
//! - Data for a different channel name never changes the state.

use std::collections::HashSet;

use harbor_proto::{ChannelEvent, ClientChannel};

/// Input to [`reduce`]: an authoritative snapshot or a single pushed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAction {
    /// Full channel snapshot from a login/logout acknowledgement or push.
    Snapshot(ClientChannel),
    /// Single event from a push or a `sendEvent` acknowledgement.
    Event(ChannelEvent),
}

/// Fold one action into the channel state.
///
/// Snapshots apply when there is no current channel or the names match; the
/// snapshot wins for `name` and `users` while the event histories are merged
/// by id, so a membership update cannot clobber an in-flight event append.
/// Events apply only to the matching channel and are deduplicated by id.
/// Anything else is dropped unchanged.
pub fn reduce(state: Option<ClientChannel>, action: ChannelAction) -> Option<ClientChannel> {
    match action {
        ChannelAction::Snapshot(snapshot) => match state {
            None => Some(normalized(snapshot)),
            Some(current) if current.name == snapshot.name => Some(merge(current, snapshot)),
            Some(current) => {
                tracing::debug!(
                    current = %current.name,
                    foreign = %snapshot.name,
                    "dropping snapshot for foreign channel"
                );
                Some(current)
            },
        },
        ChannelAction::Event(event) => match state {
            Some(mut current) if current.name == event.channel => {
                if current.events.iter().any(|existing| existing.id == event.id) {
                    return Some(current);
                }
                current.events.push(event);
                current.events.sort_by_key(|e| e.time);
                Some(current)
            },
            other => {
                tracing::debug!(
                    channel = %event.channel,
                    id = %event.id,
                    "dropping event for foreign channel"
                );
                other
            },
        },
    }
}

/// Merge a same-name snapshot into the current state.
fn merge(current: ClientChannel, snapshot: ClientChannel) -> ClientChannel {
    let mut events = current.events;
    let mut known: HashSet<String> = events.iter().map(|e| e.id.clone()).collect();
    events.extend(snapshot.events.into_iter().filter(|e| known.insert(e.id.clone())));
    events.sort_by_key(|e| e.time);

    ClientChannel { name: snapshot.name, users: snapshot.users, events }
}

/// Establish the reducer invariants on a fresh snapshot.
fn normalized(mut snapshot: ClientChannel) -> ClientChannel {
    let mut seen = HashSet::new();
    snapshot.events.retain(|e| seen.insert(e.id.clone()));
    snapshot.events.sort_by_key(|e| e.time);
    snapshot
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use harbor_proto::{EventData, SystemKind};

    use super::*;

    fn event(id: &str, channel: &str, time: i64) -> ChannelEvent {
        ChannelEvent {
            id: id.into(),
            channel: channel.into(),
            user: "ana".into(),
            time,
            data: EventData::Message { message: format!("m-{id}") },
        }
    }

    fn lobby_with(events: Vec<ChannelEvent>) -> ClientChannel {
        ClientChannel { name: "lobby".into(), users: vec!["ana".into()], events }
    }

    #[test]
    fn snapshot_installs_when_state_is_empty() {
        let state = reduce(None, ChannelAction::Snapshot(lobby_with(vec![])));
        assert_eq!(state.unwrap().name, "lobby");
    }

    #[test]
    fn snapshot_merge_preserves_existing_events() {
        let current = lobby_with(vec![event("e1", "lobby", 10)]);
        let snapshot =
            ClientChannel { name: "lobby".into(), users: vec!["bob".into()], events: vec![] };

        let next = reduce(Some(current), ChannelAction::Snapshot(snapshot)).unwrap();
        assert_eq!(next.users, vec!["bob".to_string()]);
        assert_eq!(next.events.len(), 1);
        assert_eq!(next.events[0].id, "e1");
    }

    #[test]
    fn foreign_snapshot_is_ignored() {
        let current = lobby_with(vec![event("e1", "lobby", 10)]);
        let snapshot = ClientChannel::new("other");

        let next = reduce(Some(current.clone()), ChannelAction::Snapshot(snapshot)).unwrap();
        assert_eq!(next, current);
    }

    #[test]
    fn duplicate_event_id_is_a_no_op() {
        let e = event("e1", "lobby", 10);
        let once = reduce(Some(lobby_with(vec![])), ChannelAction::Event(e.clone()));
        let twice = reduce(once.clone(), ChannelAction::Event(e));
        assert_eq!(once, twice);
        assert_eq!(twice.unwrap().events.len(), 1);
    }

    #[test]
    fn events_stay_sorted_by_time() {
        let mut state = Some(lobby_with(vec![]));
        for e in [event("e3", "lobby", 30), event("e1", "lobby", 10), event("e2", "lobby", 20)] {
            state = reduce(state, ChannelAction::Event(e));
        }
        let times: Vec<i64> = state.unwrap().events.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn equal_timestamps_keep_arrival_order() {
        let mut state = Some(lobby_with(vec![]));
        for e in [event("first", "lobby", 10), event("second", "lobby", 10)] {
            state = reduce(state, ChannelAction::Event(e));
        }
        let ids: Vec<&str> = state.as_ref().unwrap().events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn foreign_event_leaves_state_unchanged() {
        let current = lobby_with(vec![event("e1", "lobby", 10)]);
        let next = reduce(Some(current.clone()), ChannelAction::Event(event("x", "other", 5)));
        assert_eq!(next, Some(current));
    }

    #[test]
    fn event_without_channel_is_dropped() {
        assert_eq!(reduce(None, ChannelAction::Event(event("e1", "lobby", 10))), None);
    }

    #[test]
    fn system_events_participate_like_messages() {
        let sys = ChannelEvent {
            id: "s1".into(),
            channel: "lobby".into(),
            user: "bob".into(),
            time: 5,
            data: EventData::System { system: SystemKind::Login },
        };
        let state =
            reduce(Some(lobby_with(vec![event("e1", "lobby", 10)])), ChannelAction::Event(sys));
        let ids: Vec<&str> = state.as_ref().unwrap().events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "e1"]);
    }
}
