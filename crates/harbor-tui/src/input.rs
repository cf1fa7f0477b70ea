//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (login form fields, message buffer,
//! cursors) and handles character-level key events. Command parsing happens
//! here on Enter. Which editor a key goes to depends on the active route.

use harbor_app::{App, AppAction, KeyInput};
use harbor_client::SessionRoute;

use crate::commands::{self, Command};

/// A single-line text editor with a cursor.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    /// Current text in the buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents, cursor to end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
    }

    /// Take the contents, leaving the editor empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn handle_key(&mut self, key: KeyInput) {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor = self.cursor.saturating_add(c.len_utf8());
            },
            KeyInput::Backspace => {
                if let Some((offset, _)) = self.buffer[..self.cursor].char_indices().next_back() {
                    self.buffer.remove(offset);
                    self.cursor = offset;
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            },
            KeyInput::Left => {
                if let Some((offset, _)) = self.buffer[..self.cursor].char_indices().next_back() {
                    self.cursor = offset;
                }
            },
            KeyInput::Right => {
                if let Some(c) = self.buffer[self.cursor..].chars().next() {
                    self.cursor = self.cursor.saturating_add(c.len_utf8());
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.buffer.len(),
            KeyInput::Enter
            | KeyInput::Tab
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down => {},
        }
    }
}

/// Focused field of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginFocus {
    /// The user name field.
    #[default]
    UserName,
    /// The channel name field.
    ChannelName,
}

/// Input state for the TUI.
///
/// Owns the login form fields and the channel message buffer; routes keys to
/// whichever editor the active route uses.
#[derive(Debug, Default)]
pub struct InputState {
    user_name: LineEditor,
    channel_name: LineEditor,
    message: LineEditor,
    focus: LoginFocus,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The login form's user name editor.
    pub fn user_name(&self) -> &LineEditor {
        &self.user_name
    }

    /// The login form's channel name editor.
    pub fn channel_name(&self) -> &LineEditor {
        &self.channel_name
    }

    /// The channel view's message editor.
    pub fn message(&self) -> &LineEditor {
        &self.message
    }

    /// Focused field of the login form.
    pub fn focus(&self) -> LoginFocus {
        self.focus
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys, or
    /// contain session actions for submitted forms and commands).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match app.route() {
            SessionRoute::Login => self.handle_login_key(key, app),
            SessionRoute::Channel => self.handle_channel_key(key, app),
            SessionRoute::Connecting | SessionRoute::ServerOffline => match key {
                KeyInput::Esc => app.quit(),
                _ => vec![],
            },
        }
    }

    fn handle_login_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => app.quit(),
            KeyInput::Tab => {
                self.focus = match self.focus {
                    LoginFocus::UserName => LoginFocus::ChannelName,
                    LoginFocus::ChannelName => LoginFocus::UserName,
                };
                vec![AppAction::Render]
            },
            KeyInput::Enter => {
                app.login(self.user_name.buffer(), self.channel_name.buffer())
            },
            // Up asks the server for an unused channel name; Down adopts it.
            KeyInput::Up => app.request_new_channel_name(),
            KeyInput::Down => {
                if let Some(name) = app.suggested_channel() {
                    self.channel_name.set(name.to_owned());
                    self.focus = LoginFocus::ChannelName;
                }
                vec![AppAction::Render]
            },
            other => {
                match self.focus {
                    LoginFocus::UserName => self.user_name.handle_key(other),
                    LoginFocus::ChannelName => self.channel_name.handle_key(other),
                }
                vec![AppAction::Render]
            },
        }
    }

    fn handle_channel_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => app.quit(),
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab | KeyInput::Up | KeyInput::Down => vec![],
            other => {
                self.message.handle_key(other);
                vec![AppAction::Render]
            },
        }
    }

    /// Handle Enter in the channel view: parse the line and call the App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = self.message.take();
        if text.is_empty() {
            return vec![];
        }

        match commands::parse(&text) {
            Command::Logout => app.logout(),
            Command::Refresh => app.refresh_directory(),
            Command::Quit => app.quit(),
            Command::Message { content } => app.send_message(&content),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
        }
    }
}
