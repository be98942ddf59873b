//! Per-query streaming session
//!
//! One session per outgoing query. It reserves the assistant message slot
//! before the connection opens and accumulates streamed text until the
//! connection closes.

use super::message::MessageId;

/// Lifecycle of a single query's connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, connection not requested yet
    Idle,
    /// Connection requested, not open yet
    Connecting,
    /// Open; request frame sent, frames flowing
    Streaming,
    /// Terminal frame, error or close seen; later frames are ignored
    Closed,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Connecting | SessionState::Streaming)
    }
}

#[derive(Debug, Clone)]
pub struct StreamSession {
    query: String,
    state: SessionState,
    assistant_id: MessageId,
    assistant_text: String,
    received_first_token: bool,
}

impl StreamSession {
    pub fn new(query: impl Into<String>, assistant_id: MessageId) -> Self {
        Self {
            query: query.into(),
            state: SessionState::Idle,
            assistant_id,
            assistant_text: String::new(),
            received_first_token: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn assistant_id(&self) -> MessageId {
        self.assistant_id
    }

    pub fn assistant_text(&self) -> &str {
        &self.assistant_text
    }

    pub fn received_first_token(&self) -> bool {
        self.received_first_token
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub(crate) fn connecting(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Connecting;
        }
    }

    pub(crate) fn opened(&mut self) {
        if self.state.is_active() {
            self.state = SessionState::Streaming;
        }
    }

    pub(crate) fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Append a token; returns true when it was the first one
    pub(crate) fn push_token(&mut self, token: &str) -> bool {
        self.assistant_text.push_str(token);
        let first = !self.received_first_token;
        self.received_first_token = true;
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut session = StreamSession::new("q", 3);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_active());

        session.connecting();
        assert_eq!(session.state(), SessionState::Connecting);
        session.opened();
        assert_eq!(session.state(), SessionState::Streaming);
        session.close();
        assert_eq!(session.state(), SessionState::Closed);

        // a closed session never reopens
        session.connecting();
        session.opened();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn test_first_token_latch() {
        let mut session = StreamSession::new("q", 3);
        assert!(session.push_token("Hel"));
        assert!(!session.push_token("lo"));
        assert_eq!(session.assistant_text(), "Hello");
        assert!(session.received_first_token());
    }
}
