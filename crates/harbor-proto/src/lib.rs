//! Wire protocol for Harbor.
//!
//! Defines the data model shared between client and server (users, channel
//! events, channel snapshots) and the JSON request/acknowledgement/push
//! envelope carried over a duplex transport.
//!
//! Payloads use JSON for compatibility with the upstream wire format: field
//! names are camelCase and a [`ChannelEvent`]'s payload is discriminated
//! structurally (exactly one of `message` or `system` is present). The Rust
//! model replaces that duck typing with the [`EventData`] tagged union while
//! keeping the wire shape unchanged via untagged serialization.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod error;
mod event;
pub mod wire;

pub use channel::{ChannelStatus, ClientChannel, User};
pub use error::{ErrorCode, ErrorResponse, ProtoError};
pub use event::{ChannelEvent, EventData, EventKind, SystemKind};
