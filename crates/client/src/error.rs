// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Errors surfaced by the request dispatcher.
///
/// Identity-decoding problems never appear here — a malformed access token
/// only shows up as a `None` identity on the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network-level failure (connect, timeout, reading the body).
    /// Never retried by the dispatcher.
    Transport(String),
    /// No refresh credential was available, or renewal itself failed.
    /// The session-invalidated signal has already fired when this is returned.
    AuthExpired(String),
    /// Any non-auth error status from the backend, passed through untouched.
    Upstream { status: u16, body: String },
}

impl ApiError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    /// HTTP status for upstream errors, `None` for the other variants.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::AuthExpired(msg) => write!(f, "session expired: {msg}"),
            Self::Upstream { status, body } => write!(f, "upstream error ({status}): {body}"),
        }
    }
}

impl std::error::Error for ApiError {}
