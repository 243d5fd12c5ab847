// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated request dispatcher.
//!
//! Every request goes out with the current access token attached. When the
//! backend answers 401, renewal is serialized: the first request to notice
//! performs the refresh call while everyone else parks on a pending queue
//! and replays with the new token once renewal settles. At most one refresh
//! call is in flight at any time; a renewal failure rejects the trigger and
//! all waiters with the same error and force-signs the session out.

use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::session::SessionStore;

/// A request the dispatcher can transmit and, after renewal, replay.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body. Serialization of the shop's request types cannot
    /// realistically fail; a failure is logged and the body omitted.
    pub fn json<T: serde::Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => warn!("failed to serialize request body: {e}"),
        }
        self
    }
}

/// Completion handles for requests parked behind an in-flight renewal,
/// resolved with the new access token or rejected with the renewal error.
type Waiter = oneshot::Sender<Result<String, ApiError>>;

#[derive(Default)]
struct RenewalState {
    in_progress: bool,
    waiters: Vec<Waiter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
}

/// Authenticated API client for the shop backend.
///
/// Construct once per process and share by reference; the renewal flag and
/// pending queue only coordinate requests going through the same instance.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    session: Arc<SessionStore>,
    renewal: Mutex<RenewalState>,
}

impl ApiClient {
    /// Create a client for `base_url` (including any `/api` prefix).
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::builder().build().unwrap_or_default(),
            base: base_url.trim_end_matches('/').to_owned(),
            session,
            renewal: Mutex::new(RenewalState::default()),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Dispatch a request with the current access token attached.
    ///
    /// Success statuses return the response unchanged. A 401 enters the
    /// renewal path exactly once per logical request; every other error
    /// status comes back as [`ApiError::Upstream`], untouched.
    pub async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let token = self.session.current().access_token;
        let resp = self.execute(&request, token.as_deref()).await?;

        if resp.status() != StatusCode::UNAUTHORIZED {
            return finish(resp).await;
        }

        debug!(path = %request.path, "request rejected with 401, entering renewal");
        self.renew_and_replay(request).await
    }

    /// Renewal path for a request that just received its first 401.
    ///
    /// The replay after renewal is final: if it fails — even with another
    /// 401 — the failure propagates without re-entering renewal.
    async fn renew_and_replay(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        if self.session.current().refresh_token.is_none() {
            // Nothing to renew with. Fail this request, anything already
            // queued, and force a sign-out.
            let err = ApiError::AuthExpired("no refresh credential held".into());
            self.drain_waiters(Err(err.clone()));
            self.session.invalidate();
            return Err(err);
        }

        // Check-and-set happens under one lock acquisition, never held
        // across an await: either we join the in-flight renewal as a waiter
        // or we become the one renewal allowed to run.
        let parked = {
            let mut renewal = self.renewal.lock();
            if renewal.in_progress {
                let (tx, rx) = oneshot::channel();
                renewal.waiters.push(tx);
                Some(rx)
            } else {
                renewal.in_progress = true;
                None
            }
        };

        if let Some(rx) = parked {
            let token = rx
                .await
                .map_err(|_| ApiError::AuthExpired("renewal abandoned".into()))??;
            let resp = self.execute(&request, Some(&token)).await?;
            return finish(resp).await;
        }

        // Re-read after winning the flag: a renewal that settled between
        // the 401 and the check above may have rotated the pair, and the
        // refresh endpoint only honors the credential it issued last.
        let Some(refresh_token) = self.session.current().refresh_token else {
            let err = ApiError::AuthExpired("no refresh credential held".into());
            self.settle_renewal(Err(err.clone()));
            self.session.invalidate();
            return Err(err);
        };

        match self.refresh(&refresh_token).await {
            Ok(tokens) => {
                let access = tokens.access_token.clone();
                self.session
                    .set(Some(tokens.access_token), Some(tokens.refresh_token));
                info!("access credential renewed");
                self.settle_renewal(Ok(access.clone()));

                let resp = self.execute(&request, Some(&access)).await?;
                finish(resp).await
            }
            Err(err) => {
                warn!("credential renewal failed: {err}");
                self.settle_renewal(Err(err.clone()));
                self.session.clear();
                Err(err)
            }
        }
    }

    /// Drain the pending queue in enqueue order and clear the in-progress
    /// flag, all under one lock acquisition: no newly arriving request can
    /// observe the flag cleared before every waiter has its outcome.
    fn settle_renewal(&self, outcome: Result<String, ApiError>) {
        let mut renewal = self.renewal.lock();
        for waiter in renewal.waiters.drain(..) {
            let _ = waiter.send(outcome.clone());
        }
        renewal.in_progress = false;
    }

    /// Drain the pending queue without touching the in-progress flag. Used
    /// when failing fast with no renewal to settle.
    fn drain_waiters(&self, outcome: Result<String, ApiError>) {
        let mut renewal = self.renewal.lock();
        for waiter in renewal.waiters.drain(..) {
            let _ = waiter.send(outcome.clone());
        }
    }

    /// Exchange the refresh credential for a new pair. Any failure here is
    /// terminal for the session, so everything maps to `AuthExpired`.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let url = format!("{}/auth/refresh", self.base);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(|e| ApiError::AuthExpired(format!("refresh request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::AuthExpired(format!("refresh response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::AuthExpired(format!("refresh rejected ({status}): {body}")));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::AuthExpired(format!("malformed refresh response: {e}")))
    }

    /// Transmit a request once, attaching `token` when present.
    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

/// Map a transmitted response to the caller-facing outcome: success passes
/// through unchanged, anything else becomes an upstream error with its body.
async fn finish(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Upstream { status: status.as_u16(), body })
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
