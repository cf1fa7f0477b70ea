//! Presentation adapter.
//!
//! Derives per-line render metadata from the reduced event history: a
//! calendar timestamp plus `prev_is_same`/`next_is_same` flags used to group
//! consecutive lines from the same author and kind. Pure and stateless;
//! recomputed from the current [`ClientChannel`] on every state change.

use chrono::{DateTime, Local, Utc};
use harbor_proto::{ChannelEvent, ClientChannel, EventKind};

/// One renderable line of channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLine<'a> {
    /// The underlying event.
    pub event: &'a ChannelEvent,
    /// Event timestamp as calendar time.
    pub date: DateTime<Utc>,
    /// Structural kind (message vs. system).
    pub kind: EventKind,
    /// Previous line shares this line's user and kind.
    pub prev_is_same: bool,
    /// Next line shares this line's user and kind.
    pub next_is_same: bool,
}

/// Derive render lines from a channel's (already sorted) history.
pub fn lines(channel: &ClientChannel) -> Vec<EventLine<'_>> {
    let events = &channel.events;

    events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let same = |other: &ChannelEvent| {
                other.user == event.user && other.kind() == event.kind()
            };
            let prev_is_same = index.checked_sub(1).and_then(|i| events.get(i)).is_some_and(same);
            let next_is_same = events.get(index + 1).is_some_and(same);

            EventLine {
                event,
                date: epoch_ms(event.time),
                kind: event.kind(),
                prev_is_same,
                next_is_same,
            }
        })
        .collect()
}

/// Epoch milliseconds to calendar time. Out-of-range values clamp to the
/// epoch rather than failing the render.
fn epoch_ms(time: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(time).unwrap_or_default()
}

/// Short clock time for message lines, e.g. `14:03`.
pub fn format_time(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%H:%M").to_string()
}

/// Medium date plus clock time for system lines, e.g. `Aug 28, 2026 14:03`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%b %-d, %Y %H:%M").to_string()
}
