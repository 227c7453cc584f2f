//! Session and durable token storage
//!
//! The session is built once at start-up and handed to every collaborator
//! that needs the bearer token. Storage sits behind [`TokenStore`] so the
//! file-backed store can be swapped for [`MemoryTokenStore`] in tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::DashboardError;
use crate::models::AuthToken;

/// Fixed key the token is stored under
pub const TOKEN_KEY: &str = "auth_token";

/// Durable storage for a single auth token
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any
    fn load(&self) -> crate::Result<Option<AuthToken>>;

    /// Replace the stored token
    fn save(&self, token: &AuthToken) -> crate::Result<()>;

    /// Erase the stored token; erasing an absent token succeeds
    fn clear(&self) -> crate::Result<()>;
}

/// Stores the token as `<dir>/auth_token.json`
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", TOKEN_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> crate::Result<Option<AuthToken>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DashboardError::TokenStore(format!(
                "Failed to read {:?}: {}",
                self.path, e
            ))),
        }
    }

    fn save(&self, token: &AuthToken) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string(token)?;
        std::fs::write(&self.path, payload).map_err(|e| {
            DashboardError::TokenStore(format!("Failed to write {:?}: {}", self.path, e))
        })
    }

    fn clear(&self) -> crate::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DashboardError::TokenStore(format!(
                "Failed to remove {:?}: {}",
                self.path, e
            ))),
        }
    }
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn lock(&self) -> crate::Result<std::sync::MutexGuard<'_, Option<AuthToken>>> {
        self.token
            .lock()
            .map_err(|_| DashboardError::TokenStore("token lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> crate::Result<Option<AuthToken>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &AuthToken) -> crate::Result<()> {
        *self.lock()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Handle to the signed-in state, cheap to clone
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// The stored token; an unreadable store counts as signed out
    pub fn token(&self) -> Option<AuthToken> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Ignoring unreadable auth token: {}", e);
                None
            }
        }
    }

    pub fn set_token(&self, token: &AuthToken) -> crate::Result<()> {
        self.store.save(token)
    }

    pub fn remove_token(&self) -> crate::Result<()> {
        self.store.clear()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// `"<token_type> <access_token>"`, or `None` when signed out
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|t| t.authorization_header())
    }
}
