// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session state holder: the current credential pair, the identity derived
//! from it, and change notifications.
//!
//! Credentials live in a single JSON file so concurrent shopfront processes
//! share one sign-in. Writes are atomic (tmp + rename); out-of-band changes
//! are picked up by [`SessionWatcher`] and re-broadcast.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::identity::{self, Identity};

/// The access/refresh credential pair. Both slots are absent when signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl CredentialPair {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Events broadcast by the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The credential pair was rotated or cleared. Subscribers re-derive
    /// whatever identity state they cache.
    Updated,
    /// The session was forcibly ended (no refresh credential, or renewal
    /// failed). UI layers redirect to sign-in on this one specifically.
    Invalidated,
}

struct SessionState {
    pair: CredentialPair,
    identity: Option<Identity>,
}

/// Process-wide holder for the credential pair and derived identity.
pub struct SessionStore {
    path: Option<PathBuf>,
    state: RwLock<SessionState>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Create a store backed by `path`, hydrating from the file if present.
    /// Pass `None` for a purely in-memory store (tests, throwaway sessions).
    pub fn new(path: Option<PathBuf>) -> Self {
        let pair = match path.as_deref() {
            Some(p) => load_pair(p),
            None => CredentialPair::default(),
        };
        let identity = pair.access_token.as_deref().and_then(identity::decode);
        let (event_tx, _) = broadcast::channel(64);
        Self { path, state: RwLock::new(SessionState { pair, identity }), event_tx }
    }

    /// Latest known credential pair. Always a consistent snapshot: both
    /// slots were written in the same update.
    pub fn current(&self) -> CredentialPair {
        self.state.read().pair.clone()
    }

    /// Identity decoded from the current access token, recomputed on every
    /// credential change. `None` when signed out or the token is malformed.
    pub fn identity(&self) -> Option<Identity> {
        self.state.read().identity.clone()
    }

    /// Store a new credential pair (either slot may be cleared with `None`),
    /// persist it, and broadcast [`SessionEvent::Updated`].
    pub fn set(&self, access: Option<String>, refresh: Option<String>) {
        let pair = CredentialPair { access_token: access, refresh_token: refresh };
        {
            let mut state = self.state.write();
            state.identity = pair.access_token.as_deref().and_then(identity::decode);
            state.pair = pair.clone();
        }
        self.persist(&pair);
        let _ = self.event_tx.send(SessionEvent::Updated);
    }

    /// Clear both credentials and additionally broadcast
    /// [`SessionEvent::Invalidated`] so observers can force a sign-in.
    pub fn clear(&self) {
        self.set(None, None);
        let _ = self.event_tx.send(SessionEvent::Invalidated);
    }

    /// Broadcast the session-invalidated signal without touching stored
    /// credentials. Used when a 401 arrives and no refresh credential is
    /// held — there is nothing to clear, but the UI must still sign out.
    pub fn invalidate(&self) {
        let _ = self.event_tx.send(SessionEvent::Invalidated);
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Re-read the backing file and, if it differs from the in-memory pair,
    /// adopt it and broadcast [`SessionEvent::Updated`]. Returns whether
    /// anything changed. No-op for in-memory stores.
    pub fn reload(&self) -> bool {
        let Some(ref path) = self.path else {
            return false;
        };
        let pair = load_pair(path);

        {
            let mut state = self.state.write();
            if state.pair == pair {
                return false;
            }
            debug!("session credentials changed on disk, reloading");
            state.identity = pair.access_token.as_deref().and_then(identity::decode);
            state.pair = pair;
        }
        let _ = self.event_tx.send(SessionEvent::Updated);
        true
    }

    /// Write the pair to the backing file atomically (tmp + rename).
    ///
    /// Uses a unique temp filename (PID + counter) so concurrent saves
    /// racing on the same `.tmp` file cannot corrupt each other.
    fn persist(&self, pair: &CredentialPair) {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let Some(ref path) = self.path else {
            return;
        };

        let json = match serde_json::to_string_pretty(pair) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize credentials: {e}");
                return;
            }
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(
            "{}.{}.{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy(),
            std::process::id(),
            seq,
        );
        let tmp_path = path.with_file_name(tmp_name);
        if let Err(e) = std::fs::write(&tmp_path, json) {
            warn!(path = %tmp_path.display(), "failed to write credentials: {e}");
            return;
        }
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            warn!(path = %path.display(), "failed to rename credentials file: {e}");
        }
    }
}

/// Load a credential pair from disk. A missing or unreadable file reads as
/// signed-out; a malformed file is logged and also reads as signed-out.
fn load_pair(path: &Path) -> CredentialPair {
    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CredentialPair::default(),
        Err(e) => {
            warn!(path = %path.display(), "cannot read credentials: {e}");
            return CredentialPair::default();
        }
    };

    match serde_json::from_str(&data) {
        Ok(pair) => pair,
        Err(e) => {
            warn!(path = %path.display(), "malformed credentials file: {e}");
            CredentialPair::default()
        }
    }
}

/// Watches the credential file for out-of-band changes (another shopfront
/// process signing in or out) and reloads the store when it moves.
///
/// Uses `notify` for filesystem events with a polling fallback.
pub struct SessionWatcher {
    store: Arc<SessionStore>,
    poll_interval: Duration,
}

impl SessionWatcher {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store, poll_interval: Duration::from_secs(5) }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run until the `shutdown` token is cancelled. Returns immediately for
    /// in-memory stores.
    pub async fn run(self, shutdown: CancellationToken) {
        if self.store.path.is_none() {
            return;
        }

        let (wake_tx, mut wake_rx) = mpsc::channel::<()>(1);
        let _watcher = self.setup_notify_watcher(wake_tx);

        let mut poll_interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = wake_rx.recv() => {}
                _ = poll_interval.tick() => {}
            }

            self.store.reload();
        }
    }

    /// Set up a `notify` watcher on the credential file's parent directory
    /// (so file creation is detected too). The handle must be kept alive.
    fn setup_notify_watcher(&self, wake_tx: mpsc::Sender<()>) -> Option<notify::RecommendedWatcher> {
        use notify::{RecursiveMode, Watcher};

        let path = self.store.path.as_deref()?;

        let mut watcher = notify::recommended_watcher(move |_: notify::Result<notify::Event>| {
            let _ = wake_tx.try_send(());
        })
        .ok()?;

        let watch_path = path.parent().unwrap_or(path);
        watcher.watch(watch_path, RecursiveMode::NonRecursive).ok()?;
        Some(watcher)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
