//! Pure state layer for the Harbor client.
//!
//! Two stateless components:
//!
//! - [`reduce`]: folds authoritative snapshots and pushed events into the
//!   client's single [`ClientChannel`], enforcing time ordering, id
//!   uniqueness, and channel isolation.
//! - [`view`]: derives per-line render metadata (grouping, timestamps) from
//!   the reduced history; recomputable at any time from channel state alone.
//!
//! No I/O, no clocks, no allocation beyond the returned values. The
//! synchronizer in `harbor-client` is the only caller that mutates state, and
//! it does so exclusively through [`reduce`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod reducer;
pub mod view;

pub use harbor_proto::{ChannelEvent, ClientChannel, EventData, EventKind};
pub use reducer::{ChannelAction, reduce};
