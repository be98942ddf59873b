//! Screen Navigator
//!
//! Finite-state controller for the top-level view. Exactly one screen is
//! active; the username picked up on the auth screens is carried into the
//! welcome transition and the chat.
//!
//! ```text
//! Welcome --Start--> Login <--SwitchTo*--> Signup
//! Login/Signup --AuthSucceeded--> WelcomeTransition --TransitionElapsed--> Chat
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// How long the welcome transition stays on screen before the chat opens
pub const TRANSITION_DELAY: Duration = Duration::from_millis(2200);

/// Name shown on the transition screen when the auth step produced none
pub const DEFAULT_WELCOME_NAME: &str = "User";

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Welcome,
    Login,
    Signup,
    WelcomeTransition,
    Chat,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Welcome => "welcome",
            Screen::Login => "login",
            Screen::Signup => "signup",
            Screen::WelcomeTransition => "welcome_transition",
            Screen::Chat => "chat",
        };
        f.write_str(name)
    }
}

/// Inputs that move the navigator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// "Start Conversation" on the welcome screen
    Start,
    /// "Sign up" link on the login screen
    SwitchToSignup,
    /// "Sign in" link on the signup screen
    SwitchToLogin,
    /// Login or signup completed; carries the display name
    AuthSucceeded(String),
    /// The transition delay ran out
    TransitionElapsed,
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavEvent::Start => f.write_str("start"),
            NavEvent::SwitchToSignup => f.write_str("switch_to_signup"),
            NavEvent::SwitchToLogin => f.write_str("switch_to_login"),
            NavEvent::AuthSucceeded(_) => f.write_str("auth_succeeded"),
            NavEvent::TransitionElapsed => f.write_str("transition_elapsed"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Event '{event}' is not valid on the {from} screen")]
    InvalidTransition { from: Screen, event: String },
}

/// Current screen plus the cross-screen payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    screen: Screen,
    username: String,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            screen: Screen::Welcome,
            username: String::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Name for the "Welcome, …!" greeting
    pub fn welcome_name(&self) -> &str {
        if self.username.is_empty() {
            DEFAULT_WELCOME_NAME
        } else {
            &self.username
        }
    }

    /// Apply an event. Invalid events leave the navigator untouched.
    pub fn handle(&mut self, event: NavEvent) -> Result<Screen, NavigationError> {
        let next = match (self.screen, &event) {
            (Screen::Welcome, NavEvent::Start) => Screen::Login,
            (Screen::Login, NavEvent::SwitchToSignup) => Screen::Signup,
            (Screen::Signup, NavEvent::SwitchToLogin) => Screen::Login,
            (Screen::Login | Screen::Signup, NavEvent::AuthSucceeded(name)) => {
                if !name.is_empty() {
                    self.username = name.clone();
                }
                Screen::WelcomeTransition
            }
            (Screen::WelcomeTransition, NavEvent::TransitionElapsed) => Screen::Chat,
            (from, _) => {
                tracing::debug!(screen = %from, event = %event, "Ignoring invalid navigation event");
                return Err(NavigationError::InvalidTransition {
                    from,
                    event: event.to_string(),
                });
            }
        };

        tracing::debug!(from = %self.screen, to = %next, "Screen transition");
        self.screen = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let nav = Navigator::new();
        assert_eq!(nav.screen(), Screen::Welcome);
        assert_eq!(nav.username(), "");
        assert_eq!(nav.welcome_name(), "User");
    }

    #[test]
    fn test_login_flow_to_chat() {
        let mut nav = Navigator::new();
        assert_eq!(nav.handle(NavEvent::Start).unwrap(), Screen::Login);
        assert_eq!(
            nav.handle(NavEvent::AuthSucceeded("alice".into())).unwrap(),
            Screen::WelcomeTransition
        );
        assert_eq!(nav.welcome_name(), "alice");
        assert_eq!(nav.handle(NavEvent::TransitionElapsed).unwrap(), Screen::Chat);
        assert_eq!(nav.username(), "alice");
    }

    #[test]
    fn test_switch_between_login_and_signup() {
        let mut nav = Navigator::new();
        nav.handle(NavEvent::Start).unwrap();
        assert_eq!(nav.handle(NavEvent::SwitchToSignup).unwrap(), Screen::Signup);
        assert_eq!(nav.handle(NavEvent::SwitchToLogin).unwrap(), Screen::Login);
        assert_eq!(nav.handle(NavEvent::SwitchToSignup).unwrap(), Screen::Signup);
        assert_eq!(
            nav.handle(NavEvent::AuthSucceeded("Bob Smith".into())).unwrap(),
            Screen::WelcomeTransition
        );
    }

    #[test]
    fn test_empty_name_keeps_default() {
        let mut nav = Navigator::new();
        nav.handle(NavEvent::Start).unwrap();
        nav.handle(NavEvent::AuthSucceeded(String::new())).unwrap();
        assert_eq!(nav.username(), "");
        assert_eq!(nav.welcome_name(), "User");
    }

    #[test]
    fn test_invalid_event_leaves_state() {
        let mut nav = Navigator::new();
        let err = nav.handle(NavEvent::TransitionElapsed).unwrap_err();
        assert_eq!(
            err,
            NavigationError::InvalidTransition {
                from: Screen::Welcome,
                event: "transition_elapsed".into()
            }
        );
        assert_eq!(nav.screen(), Screen::Welcome);
    }

    #[test]
    fn test_chat_does_not_return_to_auth_screens() {
        let mut nav = Navigator::new();
        nav.handle(NavEvent::Start).unwrap();
        nav.handle(NavEvent::AuthSucceeded("a".into())).unwrap();
        nav.handle(NavEvent::TransitionElapsed).unwrap();

        assert!(nav.handle(NavEvent::Start).is_err());
        assert!(nav.handle(NavEvent::SwitchToLogin).is_err());
        assert!(nav.handle(NavEvent::AuthSucceeded("b".into())).is_err());
        assert_eq!(nav.screen(), Screen::Chat);
        assert_eq!(nav.username(), "a");
    }

    #[test]
    fn test_transition_delay() {
        assert_eq!(TRANSITION_DELAY.as_millis(), 2200);
    }
}
