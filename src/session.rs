// src/session.rs

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::client::types::UserProfile;
use crate::error::CliError;

/// On-disk shape of the persisted session.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    token: Option<String>,
    user: Option<UserProfile>,
}

/// Holds the bearer token and the cached profile of the signed-in user.
///
/// The token is written on login/registration, read when each request is
/// built, and destroyed on logout or when the backend rejects it. Both slots
/// sit behind their own mutex; a request in flight never mutates them.
pub struct SessionStore {
    path: Option<PathBuf>,
    token: Mutex<Option<String>>,
    user: Mutex<Option<UserProfile>>,
}

impl SessionStore {
    /// Store that never touches the filesystem. Used by tests and by
    /// environments without a resolvable config directory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            token: Mutex::new(None),
            user: Mutex::new(None),
        }
    }

    /// Load a persisted session from `path`, starting empty when the file is
    /// missing or unreadable (a stale or corrupt session file is not fatal,
    /// it just means logging in again).
    pub fn load_or_default(path: PathBuf) -> Self {
        let state = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<SessionFile>(&raw).ok())
            .unwrap_or_default();
        if state.token.is_some() {
            tracing::debug!(target: "armoire_cli::session", path = %path.display(), "Restored persisted session");
        }
        Self {
            path: Some(path),
            token: Mutex::new(state.token),
            user: Mutex::new(state.user),
        }
    }

    /// Default session file location: `<config_dir>/armoire/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("armoire").join("session.json"))
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn set_token(&self, token: String) {
        *self.token.lock().unwrap() = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user.lock().unwrap().clone()
    }

    pub fn set_user(&self, user: UserProfile) {
        *self.user.lock().unwrap() = Some(user);
    }

    pub fn clear_user(&self) {
        *self.user.lock().unwrap() = None;
    }

    /// Drop both the token and the cached profile.
    pub fn clear(&self) {
        self.clear_token();
        self.clear_user();
    }

    /// Write the current session to disk. A no-op for in-memory stores.
    pub fn persist(&self) -> Result<(), CliError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let state = SessionFile {
            token: self.token(),
            user: self.user(),
        };
        fs::write(path, serde_json::to_string_pretty(&state)?)?;
        Ok(())
    }
}
