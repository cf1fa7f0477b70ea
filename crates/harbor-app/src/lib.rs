//! Application layer for Harbor
//!
//! Pure state machines and a generic runtime for UI and session
//! orchestration, enabling deterministic simulation testing with the same
//! code that runs in production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (mirrored session view, status line, sizing)
//! - [`Bridge`]: translates App actions to session events and back
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod input;
mod runtime;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use driver::{Driver, ServerMessage};
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::Runtime;
