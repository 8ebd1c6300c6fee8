//! Persistent session store
//!
//! A small key-value file under the platform data directory holding the
//! access token (with its expiry) and the refresh token. Presence of a
//! non-expired access token is what triggers the one-time session probe at
//! startup; an expired token with a refresh token triggers a refresh first.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::TokenPair;

/// Access tokens are valid for twenty minutes.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 20 * 60;

/// Persisted session record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// Unix seconds after which the access token is stale.
    pub expires_at: u64,
    pub refresh_token: String,
}

impl Session {
    /// Build a session from a freshly issued token pair.
    pub fn issued(tokens: &TokenPair, now: u64) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            expires_at: now + ACCESS_TOKEN_TTL_SECS,
            refresh_token: tokens.refresh_token.clone(),
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// What to do about authentication at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartupAuth {
    /// A usable access token exists: issue the session probe.
    Probe,
    /// The access token is stale but a refresh token exists: refresh, then probe.
    Refresh,
    /// No stored session: the auth check completes without a probe.
    Skip,
}

/// Errors from reading or writing the session file.
#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    /// The platform reports no data directory.
    NoDataDir,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session file i/o failed: {}", e),
            SessionError::Serde(e) => write!(f, "session file is not valid json: {}", e),
            SessionError::NoDataDir => write!(f, "no platform data directory"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Serde(e)
    }
}

/// File-backed session storage.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the platform data directory.
    pub fn open_default() -> Result<Self, SessionError> {
        let dir = dirs::data_dir()
            .ok_or(SessionError::NoDataDir)?
            .join("stellar-burgers");
        Ok(Self {
            path: dir.join("session.json"),
        })
    }

    /// Store at an explicit path (tests).
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the stored session. A missing or unreadable file is treated as
    /// no session rather than an error.
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "discarding corrupt session file");
                None
            }
        }
    }

    /// Persist a session, creating the parent directory if needed.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Remove the stored session. Absence is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Decide the startup authentication path.
    pub fn startup_auth(&self, now: u64) -> StartupAuth {
        match self.load() {
            None => StartupAuth::Skip,
            Some(session) if !session.is_expired(now) => StartupAuth::Probe,
            Some(session) if !session.refresh_token.is_empty() => StartupAuth::Refresh,
            Some(_) => StartupAuth::Skip,
        }
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
