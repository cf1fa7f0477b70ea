//! Session synchronization engine for the Harbor chat client.
//!
//! Owns the client side of the single persistent server connection:
//! reconciling authoritative snapshots with the live event stream, driving
//! the connecting/login/channel/server-offline route machine, and surviving
//! disconnects without losing or duplicating history.
//!
//! The [`Session`] state machine is sans-IO: it consumes [`SessionEvent`]
//! inputs (transport lifecycle, acknowledgements, pushes, caller intents) and
//! produces [`SessionAction`] instructions for a driver to execute. All
//! channel-state mutation goes through the pure reducer in `harbor-core`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
mod identity;
mod session;
#[cfg(feature = "transport")]
pub mod transport;

pub use error::SessionError;
pub use event::{OutboundRequest, SessionAction, SessionEvent};
pub use identity::{IdentityStorage, IdentityStore, MemoryStorage};
pub use session::{OFFLINE_THRESHOLD, RELOAD_COUNTDOWN, Session, SessionRoute};
