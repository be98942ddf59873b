//! # FinanceGPT client
//!
//! Streaming chat client for the FinanceGPT financial assistant. The
//! controllers here are shared by the terminal client (this crate's binary)
//! and the browser client (`financegpt-ui`, built with
//! `default-features = false`).
//!
//! ## Modules
//!
//! - [`token`]: bearer token slot handed to every controller
//! - [`navigator`]: which screen is showing
//! - [`auth`]: login and signup forms, REST submission
//! - [`chat`]: conversation model and the streaming chat controller
//! - [`present`]: screen copy and render helpers
//! - [`config`]: API origin, endpoint table, chat and logging settings
//! - `stream`, `terminal` (feature `native`): WebSocket transport and the
//!   terminal front end
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use financegpt::{ApiConfig, ChatController, MemoryTokenStore, StreamClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiConfig::new("http://localhost:8000");
//!     let store = Arc::new(MemoryTokenStore::with_token("my-token"));
//!     let mut chat = ChatController::with_default_greeting(Arc::clone(&store));
//!
//!     StreamClient::from_config(&api)
//!         .run_query(&mut chat, "How do SIPs work?", |effect, _| {
//!             if let Some(token) = effect.token() {
//!                 print!("{}", token);
//!             }
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod chat;
pub mod config;
pub mod navigator;
pub mod present;
pub mod token;

#[cfg(feature = "native")]
pub mod stream;
#[cfg(feature = "native")]
pub mod terminal;

#[cfg(all(test, feature = "native"))]
mod testing;

// Re-export top-level types for convenience
pub use token::{MemoryTokenStore, TokenResult, TokenStore, TokenStoreError};

pub use navigator::{NavEvent, NavigationError, Navigator, Screen, TRANSITION_DELAY};

pub use auth::{
    AuthAction, AuthBackend, AuthError, AuthFormState, AuthResponse, AuthResult, LoginForm,
    SignupForm,
};

pub use chat::{
    ChatController, ChatError, ChatResult, Conversation, FrameEffect, Message, MessageId,
    Notification, QueryRequest, SessionState, StreamFrame,
};

pub use config::{ApiConfig, ChatConfig, Config, ConfigError, Endpoint, LoggingConfig};

#[cfg(feature = "native")]
pub use auth::HttpAuthBackend;

#[cfg(feature = "native")]
pub use stream::{StreamClient, StreamError};
