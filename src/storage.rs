//! Durable credential token storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token is the only state that outlives the process. The API client
//! reads it before every request; the session manager is its only writer.
//! Browser builds provide a `localStorage` implementation; native builds use
//! [`FileTokenStore`].

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;

/// Single-key store for the opaque bearer token.
pub trait TokenStore: Send + Sync {
    /// Current token, if one is stored. Blank values count as absent.
    fn load(&self) -> Option<String>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium rejects the write.
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the stored token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium rejects the removal.
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-process token store. Used by tests and short-lived clients.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `token` already stored.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        let guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        guard.as_deref().and_then(non_blank)
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

pub(crate) fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

#[cfg(feature = "native")]
pub use file::FileTokenStore;

#[cfg(feature = "native")]
mod file {
    use std::path::{Path, PathBuf};

    use super::{TokenStore, non_blank};
    use crate::error::StorageError;

    /// Token filename within the olahub config directory.
    const TOKEN_FILENAME: &str = "token";

    /// Token persisted as a single file, `0600` on Unix.
    #[derive(Debug, Clone)]
    pub struct FileTokenStore {
        path: PathBuf,
    }

    impl FileTokenStore {
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Store under the platform config dir (`~/.config/olahub/token` on Linux).
        ///
        /// # Errors
        ///
        /// Returns an error if the platform has no config directory.
        pub fn default_location() -> Result<Self, StorageError> {
            let dir = dirs::config_dir().ok_or(StorageError::NoConfigDir)?;
            Ok(Self::new(dir.join("olahub").join(TOKEN_FILENAME)))
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl TokenStore for FileTokenStore {
        fn load(&self) -> Option<String> {
            match std::fs::read_to_string(&self.path) {
                Ok(raw) => non_blank(&raw),
                Err(err) => {
                    if err.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %self.path.display(), error = %err, "token file unreadable");
                    }
                    None
                }
            }
        }

        fn save(&self, token: &str) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, token.trim())?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
            }

            Ok(())
        }

        fn clear(&self) -> Result<(), StorageError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
    }
}
