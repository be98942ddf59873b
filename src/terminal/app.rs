//! Terminal client
//!
//! Walks the navigator through the onboarding screens, then runs the chat
//! prompt. Every failure is reported inline and the prompt comes back.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use super::command::{ChatCommand, HELP_TEXT};
use super::console::Console;
use crate::auth::{
    self, AuthBackend, AuthFormState, LoginForm, SignupForm, EMPLOYMENT_TYPES, RISK_APPETITES,
};
use crate::chat::{ChatController, FrameEffect, Message};
use crate::config::ChatConfig;
use crate::navigator::{NavEvent, Navigator, Screen};
use crate::present::{self, ANALYZING_TEXT, BRAND, READY_TEXT, TAGLINE};
use crate::stream::StreamClient;
use crate::token::{MemoryTokenStore, TokenStore};

/// Erase the current line (the analyzing indicator)
const CLEAR_LINE: &str = "\r\x1b[2K";

/// How the chat session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    LoggedOut,
    EndOfInput,
}

enum Entry {
    Value(String),
    Switch,
    Eof,
}

/// Resolve a choice typed as its number, value or label
pub fn pick_choice(input: &str, choices: &[(&'static str, &'static str)]) -> Option<&'static str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| choices.get(i)).map(|(value, _)| *value);
    }
    choices
        .iter()
        .find(|(value, label)| {
            value.eq_ignore_ascii_case(input) || label.eq_ignore_ascii_case(input)
        })
        .map(|(value, _)| *value)
}

/// Numbered suggestion chips, one per line
pub fn suggestion_lines(suggestions: &[String]) -> String {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  [{}] {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[HH:MM] Speaker: text` followed by any suggestion chips
pub fn render_message(message: &Message) -> String {
    let mut out = format!(
        "[{}] {}: {}",
        present::clock(message),
        present::speaker(message),
        message.text
    );
    if !message.suggestions().is_empty() {
        out.push('\n');
        out.push_str(&suggestion_lines(message.suggestions()));
    }
    out
}

fn render_effect<S, C>(console: &mut C, effect: &FrameEffect, chat: &ChatController<S>)
where
    S: TokenStore,
    C: Console,
{
    let written = match effect {
        FrameEffect::Started { id, token } => {
            let clock = chat
                .conversation()
                .get(*id)
                .map(present::clock)
                .unwrap_or_default();
            console.print(&format!("{}[{}] {}: {}", CLEAR_LINE, clock, BRAND, token))
        }
        FrameEffect::Appended { token, .. } => console.print(token),
        FrameEffect::Recommended { recommendations, .. } if !recommendations.is_empty() => {
            console.print(&format!("\n{}", suggestion_lines(recommendations)))
        }
        _ => Ok(()),
    };
    if let Err(e) = written {
        tracing::debug!(error = %e, "Failed to write streamed output");
    }
}

pub struct TerminalApp<C, B> {
    console: C,
    backend: B,
    stream: StreamClient,
    store: Arc<MemoryTokenStore>,
    navigator: Navigator,
    chat: ChatController<Arc<MemoryTokenStore>>,
    transition_delay: Duration,
}

impl<C: Console, B: AuthBackend> TerminalApp<C, B> {
    pub fn new(
        console: C,
        backend: B,
        stream: StreamClient,
        store: Arc<MemoryTokenStore>,
        chat_config: &ChatConfig,
    ) -> Self {
        let chat = ChatController::with_greeting(
            Arc::clone(&store),
            &chat_config.greeting,
            chat_config.suggestions.iter().cloned(),
        );
        Self {
            console,
            backend,
            stream,
            store,
            navigator: Navigator::new(),
            chat,
            transition_delay: chat_config.transition_delay(),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn chat(&self) -> &ChatController<Arc<MemoryTokenStore>> {
        &self.chat
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub async fn run(&mut self) -> io::Result<SessionEnd> {
        loop {
            let event = match self.navigator.screen() {
                Screen::Welcome => self.welcome_screen().await?,
                Screen::Login => self.login_screen().await?,
                Screen::Signup => self.signup_screen().await?,
                Screen::WelcomeTransition => self.transition_screen().await?,
                Screen::Chat => return self.chat_screen().await,
            };

            let Some(event) = event else {
                return Ok(SessionEnd::EndOfInput);
            };
            if let Err(e) = self.navigator.handle(event) {
                tracing::warn!(error = %e, "Navigation rejected");
            }
        }
    }

    async fn welcome_screen(&mut self) -> io::Result<Option<NavEvent>> {
        self.console.println("")?;
        self.console.println(BRAND)?;
        self.console.println(TAGLINE)?;
        self.console.println("")?;
        self.console.println(present::WELCOME_GREETING)?;
        self.console.println(present::WELCOME_BLURB)?;
        self.console.println("")?;

        let prompt = format!("[ {} ] press Enter ", present::START_BUTTON);
        Ok(self.console.read_line(&prompt).await?.map(|_| NavEvent::Start))
    }

    /// Prompt until a non-empty value, the switch command or end of input
    async fn read_entry(&mut self, label: &str, secret: bool, switch: &str) -> io::Result<Entry> {
        let prompt = format!("{}: ", label);
        loop {
            let line = if secret {
                self.console.read_secret(&prompt).await?
            } else {
                self.console.read_line(&prompt).await?
            };
            let Some(line) = line else {
                return Ok(Entry::Eof);
            };
            if line.trim() == switch {
                return Ok(Entry::Switch);
            }
            if line.is_empty() {
                self.console
                    .println(&format!("  Please fill in {}", label.to_lowercase()))?;
                continue;
            }
            return Ok(Entry::Value(line));
        }
    }

    async fn read_choice(
        &mut self,
        label: &str,
        choices: &[(&'static str, &'static str)],
        switch: &str,
    ) -> io::Result<Entry> {
        let options: Vec<String> = choices
            .iter()
            .enumerate()
            .map(|(i, (_, label))| format!("{}) {}", i + 1, label))
            .collect();
        self.console.println(&format!("  {}", options.join("  ")))?;

        loop {
            match self.read_entry(label, false, switch).await? {
                Entry::Value(input) => match pick_choice(&input, choices) {
                    Some(value) => return Ok(Entry::Value(value.to_string())),
                    None => self.console.println("  Pick one of the listed options")?,
                },
                other => return Ok(other),
            }
        }
    }

    async fn login_screen(&mut self) -> io::Result<Option<NavEvent>> {
        self.console.println("")?;
        self.console.println(present::LOGIN_TITLE)?;
        self.console.println(present::LOGIN_SUBTITLE)?;
        self.console.println(TAGLINE)?;
        self.console
            .println(&format!("{} Type /signup to create one.", present::SIGNUP_PROMPT))?;

        let mut state = AuthFormState::new();
        loop {
            let email = match self.read_entry("Email Address", false, "/signup").await? {
                Entry::Value(email) => email,
                Entry::Switch => return Ok(Some(NavEvent::SwitchToSignup)),
                Entry::Eof => return Ok(None),
            };
            let password = match self.read_entry("Password", true, "/signup").await? {
                Entry::Value(password) => password,
                Entry::Switch => return Ok(Some(NavEvent::SwitchToSignup)),
                Entry::Eof => return Ok(None),
            };

            self.console.println(present::LOGIN_BUTTON_BUSY)?;
            let form = LoginForm::new(email, password);
            if let Some(name) = state.submit_login(&self.backend, &self.store, &form).await {
                return Ok(Some(NavEvent::AuthSucceeded(name)));
            }
            if let Some(error) = state.error() {
                self.console.println(&format!("  ! {}", error))?;
            }
        }
    }

    /// Fill every signup field; `None` payload means switch or end of input
    async fn fill_signup(&mut self) -> io::Result<Result<SignupForm, Option<NavEvent>>> {
        macro_rules! field {
            ($entry:expr) => {
                match $entry {
                    Entry::Value(value) => value,
                    Entry::Switch => return Ok(Err(Some(NavEvent::SwitchToLogin))),
                    Entry::Eof => return Ok(Err(None)),
                }
            };
        }

        self.console.println("Account Information")?;
        let email = field!(self.read_entry("Email Address", false, "/login").await?);
        let password = field!(self.read_entry("Password", true, "/login").await?);

        self.console.println("Personal Information")?;
        let name = field!(self.read_entry("Full Name", false, "/login").await?);
        let age = field!(self.read_entry("Age", false, "/login").await?);

        self.console.println("Financial Information")?;
        let income = field!(self.read_entry("Annual Income", false, "/login").await?);
        let credit_score = field!(self.read_entry("Credit Score", false, "/login").await?);
        let employment_type =
            field!(self.read_choice("Employment Type", &EMPLOYMENT_TYPES, "/login").await?);
        let risk_appetite =
            field!(self.read_choice("Risk Appetite", &RISK_APPETITES, "/login").await?);
        let financial_goals = field!(self.read_entry("Financial Goals", false, "/login").await?);

        let kyc = match self.console.read_line("KYC Verified? [y/N]: ").await? {
            Some(answer) if answer.trim() == "/login" => {
                return Ok(Err(Some(NavEvent::SwitchToLogin)))
            }
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => return Ok(Err(None)),
        };

        Ok(Ok(SignupForm {
            email,
            password,
            name,
            age,
            income,
            employment_type,
            risk_appetite,
            financial_goals,
            credit_score,
            kyc_verified: kyc,
        }))
    }

    async fn signup_screen(&mut self) -> io::Result<Option<NavEvent>> {
        self.console.println("")?;
        self.console.println(present::SIGNUP_TITLE)?;
        self.console.println(present::SIGNUP_SUBTITLE)?;
        self.console.println(TAGLINE)?;
        self.console
            .println(&format!("{} Type /login to sign in.", present::LOGIN_PROMPT))?;

        let mut state = AuthFormState::new();
        let mut form = match self.fill_signup().await? {
            Ok(form) => form,
            Err(event) => return Ok(event),
        };

        loop {
            self.console.println(present::SIGNUP_BUTTON_BUSY)?;
            if let Some(name) = state.submit_signup(&self.backend, &self.store, &form).await {
                return Ok(Some(NavEvent::AuthSucceeded(name)));
            }
            if let Some(error) = state.error() {
                self.console.println(&format!("  ! {}", error))?;
            }

            let prompt = "Enter to retry, /edit to change your details, /login to sign in: ";
            match self.console.read_line(prompt).await?.as_deref().map(str::trim) {
                None => return Ok(None),
                Some("/login") => return Ok(Some(NavEvent::SwitchToLogin)),
                Some("/edit") => {
                    form = match self.fill_signup().await? {
                        Ok(form) => form,
                        Err(event) => return Ok(event),
                    }
                }
                Some(_) => {}
            }
        }
    }

    async fn transition_screen(&mut self) -> io::Result<Option<NavEvent>> {
        self.console.println("")?;
        self.console
            .println(&present::welcome_line(self.navigator.welcome_name()))?;
        self.console.println(READY_TEXT)?;
        tokio::time::sleep(self.transition_delay).await;
        Ok(Some(NavEvent::TransitionElapsed))
    }

    async fn chat_screen(&mut self) -> io::Result<SessionEnd> {
        self.console.println("")?;
        for message in self.chat.messages() {
            self.console.println(&render_message(message))?;
        }
        self.console.println("Type /help for commands.")?;

        loop {
            let prompt = format!("{} > ", present::CHAT_PLACEHOLDER);
            let Some(line) = self.console.read_line(&prompt).await? else {
                self.chat.teardown();
                return Ok(SessionEnd::EndOfInput);
            };

            match ChatCommand::parse(&line) {
                ChatCommand::Empty => {}
                ChatCommand::Help => self.console.println(HELP_TEXT)?,
                ChatCommand::Quit => {
                    self.chat.teardown();
                    return Ok(SessionEnd::Quit);
                }
                ChatCommand::Logout => {
                    self.chat.teardown();
                    match auth::logout(&self.backend, &self.store).await {
                        Ok(()) => self.console.println("Signed out.")?,
                        Err(e) => self
                            .console
                            .println(&format!("Signed out locally; server logout failed ({})", e))?,
                    }
                    return Ok(SessionEnd::LoggedOut);
                }
                ChatCommand::Unknown(command) => self
                    .console
                    .println(&format!("Unknown command {}. Type /help.", command))?,
                ChatCommand::Suggestion(n) => {
                    let suggestion = present::latest_suggestions(self.chat.conversation())
                        .get(n - 1)
                        .cloned();
                    match suggestion {
                        Some(query) => {
                            self.console.println(&format!("You: {}", query))?;
                            self.ask(&query).await?;
                        }
                        None => self.console.println(&format!("No suggestion [{}]", n))?,
                    }
                }
                ChatCommand::Ask(query) => self.ask(&query).await?,
            }
        }
    }

    async fn ask(&mut self, query: &str) -> io::Result<()> {
        self.console.print(ANALYZING_TEXT)?;

        let mut started = false;
        let console = &mut self.console;
        let result = self
            .stream
            .run_query(&mut self.chat, query, |effect, chat| {
                if matches!(effect, FrameEffect::Started { .. }) {
                    started = true;
                }
                render_effect(&mut *console, effect, chat);
            })
            .await;

        if let Err(e) = result {
            tracing::debug!(error = %e, "Query ended early");
        }

        self.console.print(if started { "\n" } else { CLEAR_LINE })?;
        for notification in self.chat.take_notifications() {
            self.console
                .println(&format!("! {}: {}", notification.title, notification.description))?;
        }
        Ok(())
    }
}
