//! Application side-effects and intents.
//!
//! [`AppAction`] values are instructions produced by the [`crate::App`] state
//! machine for the runtime to execute.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// (Re)establish the server connection.
    Connect,

    /// Join a channel with the given credentials.
    Login {
        /// Display name to join as.
        user_name: String,
        /// Channel to join.
        channel_name: String,
    },

    /// Leave the current channel.
    Logout,

    /// Send a chat message to the current channel.
    SendMessage {
        /// Message text.
        text: String,
    },

    /// Ask the server for an unused channel name.
    RequestNewChannelName,

    /// Refetch the channel directory.
    RefreshDirectory,
}
