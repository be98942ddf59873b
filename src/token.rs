//! Session Token Store
//!
//! Holds the opaque bearer token issued by `/auth/login` or `/auth/signup`.
//! Controllers receive a store explicitly instead of reaching for a global
//! slot: auth controllers are the only writers, the chat controller and the
//! logout call only read.

use std::rc::Rc;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// A single slot holding the current bearer token
pub trait TokenStore {
    /// Current token, if one has been issued
    fn get(&self) -> Option<String>;

    /// Replace the token. An empty token clears the slot.
    fn set(&self, token: &str) -> TokenResult<()>;

    /// Forget the token
    fn clear(&self) -> TokenResult<()>;
}

/// Errors raised by token store backends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenStoreError {
    /// The backing slot cannot be reached (e.g. browser storage disabled)
    #[error("Token storage unavailable: {0}")]
    Unavailable(String),

    /// The slot rejected the write
    #[error("Failed to write token: {0}")]
    Write(String),
}

pub type TokenResult<T> = Result<T, TokenStoreError>;

/// In-process token slot. Lives as long as the client process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token (e.g. passed on the command line)
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            slot: RwLock::new(if token.is_empty() { None } else { Some(token) }),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    fn set(&self, token: &str) -> TokenResult<()> {
        if token.is_empty() {
            return self.clear();
        }
        let mut slot = self
            .slot
            .write()
            .map_err(|e| TokenStoreError::Write(e.to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> TokenResult<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| TokenStoreError::Write(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

impl<T: TokenStore + ?Sized> TokenStore for &T {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) -> TokenResult<()> {
        (**self).set(token)
    }

    fn clear(&self) -> TokenResult<()> {
        (**self).clear()
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) -> TokenResult<()> {
        (**self).set(token)
    }

    fn clear(&self) -> TokenResult<()> {
        (**self).clear()
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Rc<T> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) -> TokenResult<()> {
        (**self).set(token)
    }

    fn clear(&self) -> TokenResult<()> {
        (**self).clear()
    }
}
