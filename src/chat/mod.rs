//! Streaming Chat
//!
//! Conversation model, wire frames and the per-conversation controller that
//! turns a query into a streamed assistant answer.
//!
//! ## Protocol
//!
//! One connection per query:
//!
//! 1. client sends `{"query": "...", "token": "..." | null}` on open
//! 2. server sends zero or more plain-text token frames
//! 3. server optionally sends `{"error": "..."}` (query ends) or
//!    `{"recommendations": [...]}` (answer complete), then closes

mod controller;
mod frame;
mod message;
mod session;

pub use controller::{
    ChatController, ChatError, ChatResult, FrameEffect, Notification, DEFAULT_GREETING,
    DEFAULT_SUGGESTIONS, TRANSPORT_ERROR_MESSAGE, TRANSPORT_ERROR_TITLE,
};
pub use frame::{QueryRequest, StreamFrame, DEFAULT_STREAM_ERROR};
pub use message::{Conversation, Message, MessageId};
pub use session::{SessionState, StreamSession};
