//! Chat Session Controller
//!
//! Turns a user query into a live-updating assistant message. The controller
//! is transport-agnostic: a front end opens one connection per query and
//! feeds the connection callbacks (`on_open`, `on_frame`,
//! `on_transport_error`, `on_close`) in arrival order. All mutation happens
//! inside those callbacks, so a single-threaded event loop needs no locking.
//!
//! At most one query is in flight per conversation; a second `send` while a
//! session is connecting or streaming is rejected.

use std::collections::VecDeque;
use thiserror::Error;

use super::frame::{QueryRequest, StreamFrame};
use super::message::{Conversation, Message, MessageId};
use super::session::StreamSession;
use crate::token::TokenStore;

/// Opening assistant message shown before the first query
pub const DEFAULT_GREETING: &str =
    "Welcome to Finance GPT! Ask me anything about investments, products, or your financial goals.";

/// Starter suggestions attached to the greeting, sent to the backend verbatim
pub const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "which all services do jio finance offer",
    "I am plaaning for some retiral benifits.",
    "i am looking for low risk investments. can you help me?",
];

/// Notification text for connection-level failures
pub const TRANSPORT_ERROR_TITLE: &str = "WebSocket Error";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Failed to connect or stream response.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// A previous query's connection is still open
    #[error("A query is already in progress")]
    QueryInFlight,
}

pub type ChatResult<T> = Result<T, ChatError>;

/// Transient user-visible notice (toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// What a single inbound frame did to the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEffect {
    /// First token: the assistant message was created
    Started { id: MessageId, token: String },
    /// Later token appended to the streaming message
    Appended { id: MessageId, token: String },
    /// Suggestions attached; `id` is `None` when no assistant message exists
    Recommended {
        id: Option<MessageId>,
        recommendations: Vec<String>,
    },
    /// Server-signaled error
    Failed { message: String },
    /// No active session (late frame after close or error)
    Ignored,
}

impl FrameEffect {
    /// The transport should close the connection after this frame
    pub fn closes_session(&self) -> bool {
        matches!(
            self,
            FrameEffect::Recommended { .. } | FrameEffect::Failed { .. }
        )
    }

    /// Text token carried by this effect, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            FrameEffect::Started { token, .. } | FrameEffect::Appended { token, .. } => Some(token),
            _ => None,
        }
    }
}

/// Owns the conversation and the (at most one) active streaming session
#[derive(Debug)]
pub struct ChatController<S> {
    store: S,
    conversation: Conversation,
    input: String,
    is_analyzing: bool,
    session: Option<StreamSession>,
    notifications: VecDeque<Notification>,
}

impl<S: TokenStore> ChatController<S> {
    /// Controller with an empty conversation
    pub fn new(store: S) -> Self {
        Self {
            store,
            conversation: Conversation::new(),
            input: String::new(),
            is_analyzing: false,
            session: None,
            notifications: VecDeque::new(),
        }
    }

    /// Controller whose conversation opens with a greeting and starter suggestions
    pub fn with_greeting<I, T>(store: S, greeting: &str, suggestions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut controller = Self::new(store);
        let greeting = Message::assistant(1, greeting)
            .with_recommendations(suggestions.into_iter().map(Into::into).collect());
        controller.conversation.push(greeting);
        controller
    }

    /// Controller seeded with the default greeting
    pub fn with_default_greeting(store: S) -> Self {
        Self::with_greeting(store, DEFAULT_GREETING, DEFAULT_SUGGESTIONS)
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Option<&StreamSession> {
        self.session.as_ref()
    }

    /// Drives the "thinking" indicator
    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    pub fn has_active_session(&self) -> bool {
        self.session.as_ref().is_some_and(StreamSession::is_active)
    }

    /// A query is in flight: indicator up or answer still streaming.
    /// Input, send button and suggestion chips are disabled while busy.
    pub fn is_busy(&self) -> bool {
        self.is_analyzing || self.has_active_session()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Send button / Enter key enabled
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.input.trim().is_empty()
    }

    /// Send whatever is in the input field
    pub fn submit_input(&mut self) -> ChatResult<Option<MessageId>> {
        let query = self.input.clone();
        self.send(&query)
    }

    /// Start a query.
    ///
    /// Returns the new user message id, or `None` when the query is blank
    /// (no state change). The caller opens a connection afterwards and
    /// reports its events back.
    pub fn send(&mut self, query: &str) -> ChatResult<Option<MessageId>> {
        if query.trim().is_empty() {
            return Ok(None);
        }
        if self.has_active_session() {
            tracing::debug!("Rejecting send while a query is in flight");
            return Err(ChatError::QueryInFlight);
        }

        let user_id = self.conversation.next_id();
        let assistant_id = user_id + 1;
        self.conversation.push(Message::user(user_id, query));
        self.input.clear();
        self.is_analyzing = true;

        let mut session = StreamSession::new(query, assistant_id);
        session.connecting();
        self.session = Some(session);

        tracing::debug!(user_id, assistant_id, query_len = query.len(), "Query submitted");
        Ok(Some(user_id))
    }

    /// Connection established: build the single request frame.
    ///
    /// The token is read now, so a login that completes while connecting is
    /// still picked up.
    pub fn on_open(&mut self) -> Option<QueryRequest> {
        let session = self.session.as_mut().filter(|s| s.is_active())?;
        session.opened();
        Some(QueryRequest::new(session.query(), self.store.get()))
    }

    /// Apply one inbound text frame
    pub fn on_frame(&mut self, text: &str) -> FrameEffect {
        let Some(session) = self.session.as_mut().filter(|s| s.is_active()) else {
            tracing::debug!(frame_len = text.len(), "Ignoring frame without an active session");
            return FrameEffect::Ignored;
        };

        match StreamFrame::decode(text) {
            StreamFrame::Error(message) => {
                session.close();
                self.is_analyzing = false;
                tracing::warn!(error = %message, "Server signaled a streaming error");
                self.notifications
                    .push_back(Notification::new("Error", message.clone()));
                FrameEffect::Failed { message }
            }
            StreamFrame::Recommendations(recommendations) => {
                let assistant_id = session.assistant_id();
                session.close();
                let id = self
                    .conversation
                    .attach_recommendations(assistant_id, recommendations.clone());
                tracing::debug!(
                    count = recommendations.len(),
                    target = ?id,
                    "Received recommendations"
                );
                FrameEffect::Recommended {
                    id,
                    recommendations,
                }
            }
            StreamFrame::Token(token) => {
                if session.push_token(&token) {
                    self.is_analyzing = false;
                }
                let id = session.assistant_id();
                match self.conversation.get_mut(id) {
                    Some(message) => {
                        message.text = session.assistant_text().to_string();
                        FrameEffect::Appended { id, token }
                    }
                    None => {
                        self.conversation
                            .push(Message::assistant(id, session.assistant_text()));
                        FrameEffect::Started { id, token }
                    }
                }
            }
        }
    }

    /// Transport failure (connect refused, reset, ...)
    pub fn on_transport_error(&mut self, detail: &str) {
        self.is_analyzing = false;
        match self.session.as_mut().filter(|s| s.is_active()) {
            Some(session) => {
                session.close();
                tracing::warn!(error = %detail, "Streaming connection failed");
                self.notifications.push_back(Notification::new(
                    TRANSPORT_ERROR_TITLE,
                    TRANSPORT_ERROR_MESSAGE,
                ));
            }
            None => {
                tracing::debug!(error = %detail, "Transport error after session closed");
            }
        }
    }

    /// Connection closed, for any reason. Idempotent.
    pub fn on_close(&mut self) {
        self.is_analyzing = false;
        if let Some(session) = self.session.as_mut() {
            session.close();
        }
    }

    /// Owner going away: close whatever is still open.
    ///
    /// Returns true when an active session was abandoned, so the caller
    /// knows a socket needs closing.
    pub fn teardown(&mut self) -> bool {
        let abandoned = self.has_active_session();
        if abandoned {
            tracing::debug!("Abandoning in-flight query");
        }
        self.on_close();
        abandoned
    }

    /// Drain queued notifications, oldest first
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn pending_notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;

    fn controller() -> ChatController<MemoryTokenStore> {
        ChatController::new(MemoryTokenStore::new())
    }

    fn stream(ctl: &mut ChatController<MemoryTokenStore>, frames: &[&str]) -> Vec<FrameEffect> {
        frames.iter().map(|f| ctl.on_frame(f)).collect()
    }

    #[test]
    fn test_send_appends_user_message_and_clears_input() {
        let mut ctl = ChatController::with_default_greeting(MemoryTokenStore::new());
        ctl.set_input("how do SIPs work?");
        let before = ctl.conversation().len() as u64;

        let id = ctl.submit_input().unwrap();

        assert_eq!(id, Some(before + 1));
        assert_eq!(ctl.conversation().len() as u64, before + 1);
        let last = ctl.conversation().last().unwrap();
        assert!(last.is_user);
        assert_eq!(last.text, "how do SIPs work?");
        assert_eq!(ctl.input(), "");
        assert!(ctl.is_analyzing());
        assert_eq!(ctl.session().unwrap().assistant_id(), before + 2);
    }

    #[test]
    fn test_blank_send_is_a_no_op() {
        let mut ctl = controller();
        ctl.set_input("   ");
        assert_eq!(ctl.send("").unwrap(), None);
        assert_eq!(ctl.send(" \t\n").unwrap(), None);
        assert!(ctl.conversation().is_empty());
        assert!(!ctl.is_analyzing());
        assert!(ctl.session().is_none());
        assert_eq!(ctl.input(), "   ");
    }

    #[test]
    fn test_streamed_tokens_then_recommendations() {
        let mut ctl = controller();
        ctl.send("hi").unwrap();
        ctl.on_open().unwrap();

        let effects = stream(&mut ctl, &["Hel"]);
        assert_eq!(effects[0], FrameEffect::Started { id: 2, token: "Hel".into() });
        assert!(!ctl.is_analyzing());

        let effects = stream(&mut ctl, &["lo", r#"{"recommendations":["a","b"]}"#]);
        assert_eq!(effects[0], FrameEffect::Appended { id: 2, token: "lo".into() });
        assert!(effects[1].closes_session());

        let answer = ctl.conversation().get(2).unwrap();
        assert!(!answer.is_user);
        assert_eq!(answer.text, "Hello");
        assert_eq!(answer.recommendations, Some(vec!["a".to_string(), "b".to_string()]));

        ctl.on_close();
        assert!(!ctl.is_analyzing());
        assert!(!ctl.has_active_session());
    }

    #[test]
    fn test_indicator_clears_on_first_token_not_on_close() {
        let mut ctl = controller();
        ctl.send("hi").unwrap();
        ctl.on_open();
        assert!(ctl.is_analyzing());
        ctl.on_frame("A");
        assert!(!ctl.is_analyzing());
        assert!(ctl.has_active_session());
    }

    #[test]
    fn test_recommendations_without_tokens_attach_to_previous_answer() {
        let mut ctl = ChatController::with_greeting(MemoryTokenStore::new(), "hello", ["x0"]);
        ctl.send("q").unwrap();
        ctl.on_open();

        let effect = ctl.on_frame(r#"{"recommendations":["x"]}"#);

        assert_eq!(
            effect,
            FrameEffect::Recommended { id: Some(1), recommendations: vec!["x".into()] }
        );
        assert_eq!(ctl.conversation().len(), 2);
        assert_eq!(
            ctl.conversation().get(1).unwrap().recommendations,
            Some(vec!["x".to_string()])
        );
        assert!(ctl.conversation().get(3).is_none());
    }

    #[test]
    fn test_recommendations_without_any_assistant_message() {
        let mut ctl = controller();
        ctl.send("q").unwrap();
        ctl.on_open();
        let effect = ctl.on_frame(r#"{"recommendations":["x"]}"#);
        assert_eq!(effect, FrameEffect::Recommended { id: None, recommendations: vec!["x".into()] });
        assert_eq!(ctl.conversation().len(), 1);
    }

    #[test]
    fn test_error_frame_stops_the_query() {
        let mut ctl = controller();
        ctl.send("q").unwrap();
        ctl.on_open();

        let effect = ctl.on_frame(r#"{"error":"bad request"}"#);

        assert_eq!(effect, FrameEffect::Failed { message: "bad request".into() });
        assert!(effect.closes_session());
        assert!(!ctl.is_analyzing());
        assert_eq!(
            ctl.take_notifications(),
            vec![Notification::new("Error", "bad request")]
        );

        let snapshot = ctl.conversation().clone();
        assert_eq!(ctl.on_frame("late token"), FrameEffect::Ignored);
        assert_eq!(ctl.on_frame(r#"{"recommendations":["z"]}"#), FrameEffect::Ignored);
        assert_eq!(ctl.conversation(), &snapshot);
    }

    #[test]
    fn test_transport_error_notifies_once() {
        let mut ctl = controller();
        ctl.send("q").unwrap();
        ctl.on_transport_error("connection refused");
        ctl.on_transport_error("connection refused");
        ctl.on_close();

        assert!(!ctl.is_analyzing());
        let notes = ctl.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, TRANSPORT_ERROR_TITLE);
        assert_eq!(notes[0].description, TRANSPORT_ERROR_MESSAGE);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut ctl = controller();
        ctl.on_close();
        ctl.send("q").unwrap();
        ctl.on_close();
        ctl.on_close();
        assert!(!ctl.is_analyzing());
        assert!(!ctl.has_active_session());
    }

    #[test]
    fn test_second_send_rejected_while_streaming() {
        let mut ctl = controller();
        ctl.send("first").unwrap();
        ctl.on_open();
        ctl.on_frame("partial");

        assert_eq!(ctl.send("second"), Err(ChatError::QueryInFlight));
        assert_eq!(ctl.conversation().len(), 2);

        ctl.on_close();
        assert_eq!(ctl.send("second").unwrap(), Some(3));
        assert_eq!(ctl.session().unwrap().assistant_id(), 4);
    }

    #[test]
    fn test_request_uses_token_at_open_time() {
        let store = MemoryTokenStore::new();
        let mut ctl = ChatController::new(&store);
        ctl.send("q").unwrap();
        store.set("late-token").unwrap();

        let request = ctl.on_open().unwrap();
        assert_eq!(request, QueryRequest::new("q", Some("late-token".into())));
    }

    #[test]
    fn test_request_without_token() {
        let mut ctl = controller();
        ctl.send("q").unwrap();
        assert_eq!(ctl.on_open().unwrap().token, None);
        // no second request frame on the same session
        ctl.on_close();
        assert!(ctl.on_open().is_none());
    }

    #[test]
    fn test_teardown_abandons_active_session() {
        let mut ctl = controller();
        assert!(!ctl.teardown());
        ctl.send("q").unwrap();
        ctl.on_open();
        assert!(ctl.teardown());
        assert!(!ctl.is_analyzing());
        assert_eq!(ctl.on_frame("late"), FrameEffect::Ignored);
    }

    #[test]
    fn test_json_looking_text_inside_answer_is_kept() {
        let mut ctl = controller();
        ctl.send("q").unwrap();
        ctl.on_open();
        ctl.on_frame("Use ");
        ctl.on_frame(r#"{"rate": 7}"#);
        assert_eq!(ctl.conversation().get(2).unwrap().text, r#"Use {"rate": 7}"#);
    }

    #[test]
    fn test_can_submit() {
        let mut ctl = controller();
        assert!(!ctl.can_submit());
        ctl.set_input("q");
        assert!(ctl.can_submit());
        ctl.submit_input().unwrap();
        ctl.set_input("next");
        assert!(!ctl.can_submit());
    }

    #[test]
    fn test_busy_until_stream_closes() {
        let mut ctl = controller();
        ctl.send("first").unwrap();
        ctl.on_open();
        ctl.on_frame("partial");
        ctl.set_input("second");

        // Indicator is gone but the answer is still streaming
        assert!(!ctl.is_analyzing());
        assert!(ctl.is_busy());
        assert!(!ctl.can_submit());
        assert_eq!(ctl.submit_input(), Err(ChatError::QueryInFlight));
        assert_eq!(ctl.input(), "second");

        ctl.on_close();
        assert!(!ctl.is_busy());
        assert!(ctl.can_submit());
        assert_eq!(ctl.submit_input().unwrap(), Some(3));
        assert_eq!(ctl.input(), "");
    }

    #[test]
    fn test_greeting_carries_starter_suggestions() {
        let ctl = ChatController::with_default_greeting(MemoryTokenStore::new());
        let greeting = ctl.conversation().get(1).unwrap();
        assert!(!greeting.is_user);
        assert_eq!(
            greeting.suggestions(),
            [
                "which all services do jio finance offer",
                "I am plaaning for some retiral benifits.",
                "i am looking for low risk investments. can you help me?",
            ]
        );
    }
}
