//! Terminal UI for Harbor
//!
//! A thin shell over [`harbor_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`harbor_app::Runtime`].
//!
//! This crate only handles terminal rendering, keyboard input, and the
//! in-process demo server used when no server address is given.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod server;
pub mod terminal;
pub mod ui;

pub use harbor_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use input::InputState;
pub use terminal::{Endpoint, TerminalDriver, TerminalError};
