//! Conversation Model
//!
//! Messages in display order. The conversation is append-only apart from the
//! single assistant message that is currently streaming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message identifier, unique within a conversation
pub type MessageId = u64;

/// A single chat bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    /// Follow-up suggestions; `None` on user messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

impl Message {
    /// A complete, immutable user message
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_user: true,
            timestamp: Utc::now(),
            recommendations: None,
        }
    }

    /// An assistant message with an empty suggestion list
    pub fn assistant(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_user: false,
            timestamp: Utc::now(),
            recommendations: Some(Vec::new()),
        }
    }

    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = Some(recommendations);
        self
    }

    /// Suggestions to render as chips (empty for user messages)
    pub fn suggestions(&self) -> &[String] {
        match (&self.recommendations, self.is_user) {
            (Some(recs), false) => recs,
            _ => &[],
        }
    }
}

/// Ordered message list; insertion order is display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Id the next appended message would receive (`len + 1`)
    pub fn next_id(&self) -> MessageId {
        self.messages.len() as MessageId + 1
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Most recently appended assistant message
    pub fn last_assistant_mut(&mut self) -> Option<&mut Message> {
        self.messages.iter_mut().rev().find(|m| !m.is_user)
    }

    /// Set suggestions on message `id`, or on the latest assistant message
    /// when `id` was never created. Returns the id that received them.
    pub fn attach_recommendations(
        &mut self,
        id: MessageId,
        recommendations: Vec<String>,
    ) -> Option<MessageId> {
        let index = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .or_else(|| self.messages.iter().rposition(|m| !m.is_user))?;
        let message = &mut self.messages[index];
        message.recommendations = Some(recommendations);
        Some(message.id)
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
