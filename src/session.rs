//! Persisted member session
//!
//! A session is stored as one JSON document, `{"user": {...}, "expiresAt": <ms>}`,
//! under a single fixed key. It is always written wholesale and is valid for
//! [`session_duration`] after a successful authentication.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreError;
use crate::models::UserSummary;

/// Storage key, also the file stem of the on-disk store
pub const SESSION_KEY: &str = "session";

pub fn session_duration() -> Duration {
    Duration::minutes(10)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: UserSummary,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn start(user: UserSummary, now: DateTime<Utc>) -> Self {
        Self {
            user,
            expires_at: now + session_duration(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Load/save/clear over wherever the session lives
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError>;
    fn save(&mut self, session: &Session) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Read the stored session and apply the expiry rule.
///
/// Expired and unreadable entries are deleted; only a live session is returned.
pub fn restore<S: SessionStore + ?Sized>(store: &mut S, now: DateTime<Utc>) -> Option<Session> {
    match store.load() {
        Ok(Some(session)) if !session.is_expired(now) => Some(session),
        Ok(Some(_)) => {
            if let Err(e) = store.clear() {
                warn!("failed to remove expired session: {}", e);
            }
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!("discarding unreadable session: {}", e);
            if let Err(e) = store.clear() {
                warn!("failed to remove unreadable session: {}", e);
            }
            None
        }
    }
}

/// JSON file in the per-user config directory
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", SESSION_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(session)?)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for controller tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    pub session: Option<Session>,
    pub saves: usize,
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        self.session = Some(session.clone());
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.session = None;
        Ok(())
    }
}
