//! Auth state holder
//!
//! Client-side holder for callers that embed the crate directly; the HTTP
//! server never uses it and authorizes requests in the API layer instead.
//!
//! Owns the signed-in user for one client context and the persisted session
//! token behind it. Created explicitly and passed around; there is no
//! process-wide instance.
//!
//! Lifecycle: [`AuthState::init`] restores a persisted token (clearing it
//! silently when it no longer maps to an active user), sign-in/sign-up
//! persist a new token, [`AuthState::sign_out`] clears it.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::models::{SignUp, User};
use thiserror::Error;

use super::permissions::role_has_permission;
use super::service::{AuthError, AuthService, AuthSession};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted client state: a single session-token slot
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    session_token: Option<String>,
}

/// Token kept in a small JSON file (`{"session_token": "..."}`)
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, file: &TokenFile) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: TokenFile = serde_json::from_str(&content)?;
        Ok(file.session_token.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        self.write(&TokenFile {
            session_token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        if self.path.exists() {
            self.write(&TokenFile::default())?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock() = None;
        Ok(())
    }
}

pub struct AuthState<S: TokenStore> {
    service: AuthService,
    store: S,
    current: Mutex<Option<User>>,
}

impl<S: TokenStore> AuthState<S> {
    pub fn new(service: AuthService, store: S) -> Self {
        Self {
            service,
            store,
            current: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Restore the session from the persisted token.
    ///
    /// Never fails: an unreadable, expired, or orphaned token is cleared and
    /// the holder starts signed out.
    pub async fn init(&self) -> Option<User> {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session unreadable, clearing");
                self.clear_store();
                return None;
            }
        };

        match self.service.resolve(&token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                *self.current.lock() = Some(user.clone());
                Some(user)
            }
            Err(e) => {
                if matches!(e, AuthError::Gateway(_)) {
                    tracing::warn!(error = %e, "Session check failed, clearing token");
                } else {
                    tracing::debug!(error = %e, "Persisted session no longer valid");
                }
                self.clear_store();
                None
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let session = self.service.sign_in(email, password).await?;
        self.adopt(session)
    }

    pub async fn sign_up(&self, data: SignUp) -> Result<User, AuthError> {
        let session = self.service.sign_up(data).await?;
        self.adopt(session)
    }

    pub fn sign_out(&self) {
        self.clear_store();
        *self.current.lock() = None;
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.lock().clone()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|user| role_has_permission(user.role, permission))
    }

    fn adopt(&self, session: AuthSession) -> Result<User, AuthError> {
        self.store
            .save(&session.token)
            .map_err(|e| AuthError::Internal(format!("Failed to persist session: {e}")))?;
        *self.current.lock() = Some(session.user.clone());
        Ok(session.user)
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }
}
