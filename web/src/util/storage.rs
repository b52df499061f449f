//! Durable credential storage in browser `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The core `SessionManager` persists the token through the `TokenStore`
//! seam; in the browser that is one `localStorage` entry. Outside the
//! browser the store is always empty and refuses writes.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use olahub::error::StorageError;
use olahub::storage::TokenStore;

/// `localStorage` key holding the credential token.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageTokenStore;

/// Treat a missing or whitespace-only entry as "no token".
fn stored_token(raw: Option<String>) -> Option<String> {
    raw.filter(|token| !token.trim().is_empty())
}

#[cfg(feature = "csr")]
pub(crate) fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
    window
        .local_storage()
        .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
        .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_owned()))
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            let storage = match local_storage() {
                Ok(storage) => storage,
                Err(err) => {
                    log::warn!("token load skipped: {err}");
                    return None;
                }
            };
            match storage.get_item(TOKEN_KEY) {
                Ok(raw) => stored_token(raw),
                Err(e) => {
                    log::warn!("token load failed: {e:?}");
                    None
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            stored_token(None)
        }
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .set_item(TOKEN_KEY, token)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
            Err(StorageError::Unavailable("localStorage requires a browser".to_owned()))
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .remove_item(TOKEN_KEY)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            Ok(())
        }
    }
}
