//! Deterministic simulation harness for Harbor client testing.
//!
//! Provides three pieces that let the production orchestration code run
//! without a terminal or a network:
//!
//! - [`SimDriver`]: a [`harbor_app::Driver`] with injectable events, captured
//!   requests, and a virtual clock.
//! - [`SimServer`]: an in-memory model of the chat server with a logical
//!   clock and seeded RNG, so every run produces identical frames.
//! - [`Scenario`]: wires App, Bridge, and `SimServer` together and pumps
//!   messages between them, for end-to-end behavior tests.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod scenario;
pub mod sim_driver;
pub mod sim_server;

pub use scenario::Scenario;
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_server::SimServer;
