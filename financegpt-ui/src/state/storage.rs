//! Browser token storage
//!
//! The bearer token lives in `localStorage` under the `token` key.

use financegpt::token::{TokenResult, TokenStore, TokenStoreError};
use web_sys::Storage;

pub const TOKEN_KEY: &str = "token";

/// [`TokenStore`] over `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageTokenStore;

impl LocalStorageTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> TokenResult<Storage> {
        web_sys::window()
            .ok_or_else(|| TokenStoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| TokenStoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| TokenStoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn get(&self) -> Option<String> {
        Self::storage()
            .ok()?
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, token: &str) -> TokenResult<()> {
        if token.is_empty() {
            return self.clear();
        }
        Self::storage()?
            .set_item(TOKEN_KEY, token)
            .map_err(|e| TokenStoreError::Write(format!("{:?}", e)))
    }

    fn clear(&self) -> TokenResult<()> {
        Self::storage()?
            .remove_item(TOKEN_KEY)
            .map_err(|e| TokenStoreError::Write(format!("{:?}", e)))
    }
}
