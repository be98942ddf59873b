//! Streaming transport
//!
//! Native WebSocket client that feeds a [`crate::chat::ChatController`].

mod client;

pub use client::{StreamClient, StreamError};
