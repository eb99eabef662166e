//! Session manager.
//!
//! The session is an explicit state value shared by everything that talks
//! to the remote store. Its marker (the logged-in flag plus the session
//! cookie) can be backed by a file so separate processes share one login.

use crate::api::ApiError;
use eyre::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Session marker file name within the data directory.
pub const SESSION_FILE: &str = "session.json";

/// Authentication state of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// On-disk form of the session marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub logged_in: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

/// Shared session handle.
pub struct Session {
    state: watch::Sender<SessionState>,
    marker_path: Option<PathBuf>,
    cookie: Mutex<Option<String>>,
    reloads: AtomicU64,
}

impl Session {
    /// An unauthenticated session with no backing file.
    pub fn in_memory() -> Self {
        Self::with_marker(None, SessionMarker::default())
    }

    /// Restore the session from `path`. A missing file yields an
    /// unauthenticated session.
    pub fn restore(path: &Path) -> Result<Self> {
        let marker = if path.exists() {
            let raw = fs::read_to_string(path).context("Failed to read session marker")?;
            serde_json::from_str(&raw).context("Failed to parse session marker")?
        } else {
            SessionMarker::default()
        };
        Ok(Self::with_marker(Some(path.to_path_buf()), marker))
    }

    fn with_marker(marker_path: Option<PathBuf>, marker: SessionMarker) -> Self {
        let state = if marker.logged_in {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        let (tx, _rx) = watch::channel(state);
        Self {
            state: tx,
            marker_path,
            cookie: Mutex::new(marker.cookie),
            reloads: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Observe state transitions. Every forced reload is published, even if
    /// the session was already unauthenticated.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Number of forced reloads since this session was created.
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::SeqCst)
    }

    /// Cookie captured at login, if any.
    pub fn cookie(&self) -> Option<String> {
        self.cookie.lock().ok().and_then(|c| c.clone())
    }

    /// `Unauthenticated -> Authenticated` after a successful login.
    pub fn authenticate(&self, cookie: Option<String>) -> Result<()> {
        if let Ok(mut slot) = self.cookie.lock() {
            *slot = cookie.clone();
        }
        self.write_marker(&SessionMarker {
            logged_in: true,
            cookie,
        })?;
        self.state.send_replace(SessionState::Authenticated);
        info!("Session authenticated");
        Ok(())
    }

    /// Explicit logout: drop to unauthenticated without a reload.
    pub fn sign_out(&self) {
        self.clear();
        self.state.send_replace(SessionState::Unauthenticated);
        info!("Session signed out");
    }

    /// Forced-reload policy: clear the marker, drop to unauthenticated and
    /// signal subscribers to rebuild the client from scratch.
    pub fn force_reload(&self, cause: &ApiError) {
        let kind = if cause.is_auth() {
            "auth"
        } else if cause.is_transient() {
            "transient"
        } else {
            "remote"
        };
        warn!("Forcing reload after {} failure: {}", kind, cause);

        self.clear();
        self.reloads.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SessionState::Unauthenticated);
    }

    /// Clear the marker without changing state; used when a login attempt
    /// fails.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.cookie.lock() {
            *slot = None;
        }
        if let Some(path) = &self.marker_path
            && path.exists()
            && let Err(e) = fs::remove_file(path)
        {
            warn!("Failed to remove session marker {}: {}", path.display(), e);
        }
    }

    fn write_marker(&self, marker: &SessionMarker) -> Result<()> {
        let Some(path) = &self.marker_path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create session directory")?;
        }
        let json = serde_json::to_string(marker)?;
        fs::write(path, json).context("Failed to write session marker")?;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}
