//! Backend access over gloo-net

pub mod client;

pub use client::{api_config, GlooAuthBackend};
