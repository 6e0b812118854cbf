//! services/portal/src/adapters/session_file.rs
//!
//! A `SessionStore` that keeps the token pair in a small JSON file so a
//! session survives between runs of the client.

use clinic_portal_core::domain::{PersistedSession, TokenPair};
use clinic_portal_core::ports::{PortError, PortResult, SessionStore};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// The on-disk layout. Keys mirror the browser's storage keys.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> PortResult<Option<PersistedSession>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                error!("Failed to read session file: {:?}", e);
                return Err(PortError::Unexpected(e.to_string()));
            }
        };

        // A corrupt file means no session rather than a broken client.
        let stored: StoredSession = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                debug!("Ignoring unreadable session file: {}", e);
                return Ok(None);
            }
        };

        Ok(Some(PersistedSession {
            tokens: TokenPair {
                access: stored.token,
                refresh: stored.refresh_token,
            },
            username: stored.username,
        }))
    }

    fn save(&self, session: &PersistedSession) -> PortResult<()> {
        let stored = StoredSession {
            token: session.tokens.access.clone(),
            refresh_token: session.tokens.refresh.clone(),
            username: session.username.clone(),
        };
        let body = serde_json::to_string_pretty(&stored)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create session directory: {:?}", e);
                PortError::Unexpected(e.to_string())
            })?;
        }
        std::fs::write(&self.path, body).map_err(|e| {
            error!("Failed to write session file: {:?}", e);
            PortError::Unexpected(e.to_string())
        })
    }

    fn clear(&self) -> PortResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove session file: {:?}", e);
                Err(PortError::Unexpected(e.to_string()))
            }
        }
    }
}
