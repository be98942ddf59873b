//! Presentation
//!
//! Screen copy and render helpers shared by the terminal and browser front
//! ends. Everything here is a pure function of controller state.

use chrono::{DateTime, Local, TimeZone};

use crate::chat::{Conversation, Message};

pub const BRAND: &str = "Finance GPT";
pub const TAGLINE: &str = "powered by jio finance";

pub const WELCOME_GREETING: &str = "Hello, Finance Explorer!";
pub const WELCOME_BLURB: &str = "Your intelligent financial assistant is ready to help you with \
     market analysis, investment strategies, and financial planning.";
pub const START_BUTTON: &str = "Start Conversation";

pub const LOGIN_TITLE: &str = "Welcome Back";
pub const LOGIN_SUBTITLE: &str = "Sign in to your Finance GPT account";
pub const LOGIN_BUTTON: &str = "Sign In";
pub const LOGIN_BUTTON_BUSY: &str = "Signing In...";
pub const SIGNUP_PROMPT: &str = "Don't have an account?";

pub const SIGNUP_TITLE: &str = "Create Account";
pub const SIGNUP_SUBTITLE: &str = "Join Finance GPT and start your financial journey";
pub const SIGNUP_BUTTON: &str = "Create Account";
pub const SIGNUP_BUTTON_BUSY: &str = "Creating Account...";
pub const LOGIN_PROMPT: &str = "Already have an account?";

pub const READY_TEXT: &str = "Finance GPT is ready to assist you.";
pub const ANALYZING_TEXT: &str = "Analyzing your request...";
pub const CHAT_PLACEHOLDER: &str = "Ask Finance GPT anything...";

/// "Welcome, <name>!" line of the transition screen
pub fn welcome_line(name: &str) -> String {
    format!("Welcome, {}!", name)
}

/// Bubble label
pub fn speaker(message: &Message) -> &'static str {
    if message.is_user {
        "You"
    } else {
        BRAND
    }
}

/// `HH:MM` in the given zone
pub fn clock_in<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%H:%M").to_string()
}

/// `HH:MM` in local time
pub fn clock(message: &Message) -> String {
    clock_in(&message.timestamp.with_timezone(&Local))
}

/// One rendered element of the chat view
#[derive(Debug, Clone, PartialEq)]
pub enum ChatRow<'a> {
    Bubble(&'a Message),
    /// Transient "thinking" indicator; never part of the conversation
    Analyzing,
}

/// Chat view rows: every message in order, then the indicator if active
pub fn chat_rows(conversation: &Conversation, is_analyzing: bool) -> Vec<ChatRow<'_>> {
    let mut rows: Vec<ChatRow<'_>> = conversation.iter().map(ChatRow::Bubble).collect();
    if is_analyzing {
        rows.push(ChatRow::Analyzing);
    }
    rows
}

/// Suggestions carried by the newest assistant message
pub fn latest_suggestions(conversation: &Conversation) -> &[String] {
    conversation
        .messages()
        .iter()
        .rev()
        .find(|m| !m.is_user)
        .map(Message::suggestions)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_welcome_line() {
        assert_eq!(welcome_line("Asha"), "Welcome, Asha!");
    }

    #[test]
    fn test_clock_in_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 59).unwrap();
        assert_eq!(clock_in(&ts), "07:05");
    }

    #[test]
    fn test_chat_rows_end_with_indicator() {
        let mut conv = Conversation::new();
        conv.push(Message::assistant(1, "hi"));
        conv.push(Message::user(2, "q"));

        let rows = chat_rows(&conv, true);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], ChatRow::Analyzing);
        assert!(matches!(rows[1], ChatRow::Bubble(m) if m.is_user));

        assert_eq!(chat_rows(&conv, false).len(), 2);
    }

    #[test]
    fn test_latest_suggestions_come_from_newest_answer() {
        let mut conv = Conversation::new();
        conv.push(Message::assistant(1, "hi").with_recommendations(vec!["a".into()]));
        conv.push(Message::user(2, "q"));
        assert_eq!(latest_suggestions(&conv), ["a".to_string()]);

        conv.push(Message::assistant(3, "answer"));
        assert!(latest_suggestions(&conv).is_empty());
    }

    #[test]
    fn test_speaker() {
        assert_eq!(speaker(&Message::user(1, "q")), "You");
        assert_eq!(speaker(&Message::assistant(2, "a")), "Finance GPT");
    }
}
