//! Auth-session state for the signed-in console user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is the single source of truth for "who is logged in". The API
//! client reads tokens from it on every request and the refresh path is its
//! only writer besides login/logout. Route guards and views observe it via
//! `subscribe()`.
//!
//! DESIGN
//! ======
//! The current session lives inside a `watch` channel: readers clone the
//! whole `Session`, writers replace it in one step, so nobody observes a
//! half-updated token pair.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::storage::SessionStorage;
use crate::error::StoreError;

/// Storage key holding the serialized session object.
pub const SESSION_KEY: &str = "userData";
/// Storage key mirroring the access token.
pub const ACCESS_TOKEN_KEY: &str = "token";
/// Storage key mirroring the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh";

// =============================================================================
// ROLE
// =============================================================================

/// Organizational role granted by the backend at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "Employee")]
    Employee,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Hr, Role::Admin, Role::Manager, Role::Employee];

    /// Wire name used by the backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hr => "HR",
            Self::Admin => "ADMIN",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// The authenticated user's identity plus current tokens.
///
/// Either every field is populated or there is no session at all.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(rename = "refresh")]
    pub refresh_token: String,
    pub username: String,
    pub role: Role,
}

impl Session {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            username: username.into(),
            role,
        }
    }

    /// All string fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty() && !self.username.is_empty()
    }
}

// Tokens stay out of logs and panic messages.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// STORE
// =============================================================================

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Open the store, rehydrating any previously persisted session.
    ///
    /// A missing, malformed, or partial session starts the store logged out
    /// and clears the stale keys.
    pub fn open(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = rehydrate(storage.as_ref());
        let (current, _) = watch::channel(restored);
        Self { storage, current }
    }

    /// Persist `session` and make it current.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written to storage. The
    /// in-memory session is unchanged and storage is rolled back to it, so a
    /// failed login is never rehydrated on the next start.
    pub fn login(&self, session: Session) -> Result<(), StoreError> {
        if let Err(e) = persist(self.storage.as_ref(), &session) {
            self.roll_back_storage();
            return Err(e);
        }
        tracing::info!(username = %session.username, role = %session.role, "session started");
        self.current.send_replace(Some(session));
        Ok(())
    }

    /// Clear the session and notify subscribers.
    ///
    /// Returns `true` when a session was cleared and `false` when already
    /// logged out. Storage failures are logged; in-memory state is cleared
    /// regardless so the caller is never left half-authenticated.
    pub fn logout(&self) -> bool {
        let cleared = self.current.send_if_modified(|slot| slot.take().is_some());
        if cleared {
            tracing::info!("session cleared");
        }
        if let Err(e) = clear(self.storage.as_ref()) {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        cleared
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.access_token.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.refresh_token.clone())
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.current.borrow().as_ref().map(|s| s.role)
    }

    /// Swap in renewed tokens. `refresh_token` is only replaced when the
    /// backend rotated it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSession`] when logged out, or a storage error
    /// if the renewed session cannot be persisted.
    pub fn replace_tokens(&self, access_token: &str, refresh_token: Option<&str>) -> Result<(), StoreError> {
        let mut renewed = None;
        self.current.send_if_modified(|slot| {
            let Some(session) = slot.as_mut() else {
                return false;
            };
            session.access_token = access_token.to_owned();
            if let Some(refresh) = refresh_token.filter(|r| !r.is_empty()) {
                session.refresh_token = refresh.to_owned();
            }
            renewed = Some(session.clone());
            true
        });
        let renewed = renewed.ok_or(StoreError::NoSession)?;
        persist(self.storage.as_ref(), &renewed)
    }

    fn roll_back_storage(&self) {
        let restored = match self.current() {
            Some(previous) => persist(self.storage.as_ref(), &previous),
            None => clear(self.storage.as_ref()),
        };
        if let Err(e) = restored {
            tracing::warn!(error = %e, "failed to roll back persisted session");
        }
    }

    /// Observe session changes (login, refresh, logout).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }
}

fn persist(storage: &dyn SessionStorage, session: &Session) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(session)?;
    storage.set(SESSION_KEY, &encoded)?;
    storage.set(ACCESS_TOKEN_KEY, &session.access_token)?;
    storage.set(REFRESH_TOKEN_KEY, &session.refresh_token)?;
    Ok(())
}

fn clear(storage: &dyn SessionStorage) -> Result<(), StoreError> {
    storage.remove(SESSION_KEY)?;
    storage.remove(REFRESH_TOKEN_KEY)?;
    storage.remove(ACCESS_TOKEN_KEY)?;
    Ok(())
}

fn rehydrate(storage: &dyn SessionStorage) -> Option<Session> {
    let raw = match storage.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "session storage unreadable; starting logged out");
            return None;
        }
    };

    match serde_json::from_str::<Session>(&raw) {
        Ok(session) if session.is_complete() => {
            // Mirrors may lag behind the session object after a crash.
            if let Err(e) = persist(storage, &session) {
                tracing::warn!(error = %e, "failed to rewrite token mirrors");
            }
            tracing::debug!(username = %session.username, "session restored");
            Some(session)
        }
        Ok(_) | Err(_) => {
            tracing::warn!("persisted session malformed; starting logged out");
            if let Err(e) = clear(storage) {
                tracing::warn!(error = %e, "failed to clear malformed session");
            }
            None
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
