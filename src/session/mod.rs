//! Session store: the single owner of the admin bearer token.
//!
//! A [`Session`] is a cheap cloneable handle passed explicitly to every component
//! that needs the token. Writes go through the handle, which persists them to its
//! [`TokenStorage`] and broadcasts the new value to subscribers.
//!
//! A present token is only a claim. Validity is known after the route guard checks
//! it or a server round-trip rejects it.

pub mod storage;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::AdminError;

pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageError, TokenStorage};

#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Box<dyn TokenStorage>,
    token: watch::Sender<Option<String>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.is_present())
            .finish()
    }
}

impl Session {
    /// Open a session over `storage`, restoring any persisted token.
    ///
    /// An unreadable stored token counts as no token: it is removed and the session
    /// starts empty.
    pub fn open(storage: impl TokenStorage + 'static) -> Result<Self, StorageError> {
        let restored = match storage.load() {
            Ok(token) => token,
            Err(e @ StorageError::Corrupted { .. }) => {
                warn!("Discarding stored admin token: {}", e);
                storage.clear()?;
                None
            }
            Err(e) => return Err(e),
        };
        if restored.is_some() {
            debug!("Restored persisted admin token");
        }
        let (token, _) = watch::channel(restored);
        Ok(Self {
            inner: Arc::new(SessionInner {
                storage: Box::new(storage),
                token,
            }),
        })
    }

    /// Session with no persistence
    pub fn in_memory() -> Self {
        let (token, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                storage: Box::new(MemoryTokenStorage::new()),
                token,
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.token.borrow().clone()
    }

    pub fn is_present(&self) -> bool {
        self.inner.token.borrow().is_some()
    }

    /// Persist then publish a freshly issued token
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), StorageError> {
        let token = token.into();
        self.inner.storage.store(&token)?;
        self.inner.token.send_replace(Some(token));
        info!("Admin session started");
        Ok(())
    }

    /// Drop the token. The in-memory value is cleared even when storage fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let had_token = self.inner.token.send_replace(None).is_some();
        if had_token {
            info!("Admin session cleared");
        }
        self.inner.storage.clear()
    }

    /// Clear the session when `error` means the token is no longer accepted.
    /// Returns whether the session was invalidated.
    pub fn invalidate_on(&self, error: &AdminError) -> bool {
        if !error.is_auth_failure() {
            return false;
        }
        warn!("Invalidating admin session: {}", error);
        if let Err(e) = self.clear() {
            warn!("Failed to remove persisted token: {}", e);
        }
        true
    }

    /// Change notifications; the receiver sees the current token immediately
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.inner.token.subscribe()
    }
}
