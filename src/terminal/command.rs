//! Chat prompt commands

/// One line typed at the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Plain text: send as a query
    Ask(String),
    /// `/N`: re-send suggestion N (1-based)
    Suggestion(usize),
    Logout,
    Quit,
    Help,
    /// Unrecognised slash command
    Unknown(String),
    /// Blank line
    Empty,
}

pub const HELP_TEXT: &str = "\
Commands:
  /1, /2, ...  ask a suggested follow-up
  /logout      sign out and leave the chat
  /quit        exit
  /help        show this help";

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ChatCommand::Empty;
        }

        let Some(command) = trimmed.strip_prefix('/') else {
            return ChatCommand::Ask(line.to_string());
        };

        match command {
            "quit" | "exit" | "q" => ChatCommand::Quit,
            "logout" => ChatCommand::Logout,
            "help" | "?" => ChatCommand::Help,
            _ => match command.parse::<usize>() {
                Ok(n) if n > 0 => ChatCommand::Suggestion(n),
                _ => ChatCommand::Unknown(trimmed.to_string()),
            },
        }
    }
}
