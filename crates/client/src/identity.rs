// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort identity decoding from JWT access tokens.
//!
//! Decoding is lossy by design: any malformed token yields `None` rather
//! than an error. The signature is never verified — the backend does that;
//! the client only needs the claims for display and role-gated commands.

use std::collections::BTreeSet;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

/// Identity derived from the current access token's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The `sub` claim (username), when present.
    pub subject: Option<String>,
    /// Normalized role names from the `roles` claim.
    pub roles: BTreeSet<String>,
    /// The `exp` claim converted to epoch milliseconds.
    pub expires_at_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<u64>,
    #[serde(default)]
    roles: Option<serde_json::Value>,
}

/// Decode the claims segment of an access token into an [`Identity`].
///
/// Returns `None` for anything that is not a three-segment JWT with a
/// base64url JSON payload.
pub fn decode(token: &str) -> Option<Identity> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    Some(Identity {
        subject: claims.sub,
        roles: normalize_roles(claims.roles.as_ref()),
        expires_at_ms: claims.exp.map(|secs| secs * 1000),
    })
}

/// Normalize the `roles` claim into a set of role names.
///
/// The backend emits roles in three shapes depending on the serializer in
/// play: `["A","B"]`, `[{"authority":"A"},...]`, or a single `"A,B"` string.
fn normalize_roles(roles: Option<&serde_json::Value>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    match roles {
        Some(serde_json::Value::Array(entries)) => {
            for entry in entries {
                match entry {
                    serde_json::Value::String(s) if !s.is_empty() => {
                        out.insert(s.clone());
                    }
                    serde_json::Value::Object(obj) => {
                        if let Some(auth) = obj.get("authority").and_then(|v| v.as_str()) {
                            if !auth.is_empty() {
                                out.insert(auth.to_owned());
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        Some(serde_json::Value::String(joined)) => {
            for role in joined.split(',') {
                let role = role.trim();
                if !role.is_empty() {
                    out.insert(role.to_owned());
                }
            }
        }
        _ => {}
    }
    out
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
