//! Slash-command parsing for the channel input line.

/// Parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the current channel.
    Logout,
    /// Refetch the channel directory.
    Refresh,
    /// Quit the application.
    Quit,
    /// Plain chat message.
    Message {
        /// Message text.
        content: String,
    },
    /// Unrecognized slash command.
    Unknown {
        /// The raw input.
        input: String,
    },
}

/// Parse an input line into a command.
///
/// Lines not starting with `/` are chat messages.
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Message { content: trimmed.to_owned() };
    };

    match rest {
        "logout" | "leave" => Command::Logout,
        "refresh" => Command::Refresh,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: trimmed.to_owned() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(parse("hello there"), Command::Message { content: "hello there".into() });
    }

    #[test]
    fn logout_and_alias() {
        assert_eq!(parse("/logout"), Command::Logout);
        assert_eq!(parse("/leave"), Command::Logout);
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(parse("/frobnicate"), Command::Unknown { input: "/frobnicate".into() });
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(parse("  /quit  "), Command::Quit);
    }
}
