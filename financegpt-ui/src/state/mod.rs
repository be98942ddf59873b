//! State Management
//!
//! Global application state, browser token storage and the per-query
//! WebSocket.

pub mod global;
pub mod storage;
pub mod websocket;

pub use global::{provide_global_state, use_global_state, GlobalState, ToastItem};
pub use storage::LocalStorageTokenStore;
pub use websocket::ChatSocket;
