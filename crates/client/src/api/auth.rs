// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authentication endpoints: login, register, refresh, profile.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dispatch::{ApiClient, ApiRequest};
use crate::error::ApiError;

use super::read_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Token pair issued by login and refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// The authenticated user's profile record.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Sign in and store the issued credential pair in the session.
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    let resp = client.send(ApiRequest::post("/auth/login").json(request)).await?;
    let tokens: AuthResponse = read_json(resp).await?;
    client
        .session()
        .set(Some(tokens.access_token.clone()), Some(tokens.refresh_token.clone()));
    debug!("signed in, credentials stored");
    Ok(tokens)
}

/// Create an account. The backend answers with a plain confirmation string.
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<String, ApiError> {
    let resp = client.send(ApiRequest::post("/auth/register").json(request)).await?;
    resp.text()
        .await
        .map_err(|e| ApiError::Transport(format!("read response body: {e}")))
}

/// Exchange a refresh credential for a new pair without storing it.
/// The dispatcher performs its own renewal internally; this is the explicit
/// endpoint for callers managing tokens themselves.
pub async fn refresh(client: &ApiClient, refresh_token: &str) -> Result<AuthResponse, ApiError> {
    let body = serde_json::json!({ "refreshToken": refresh_token });
    let resp = client.send(ApiRequest::post("/auth/refresh").json(&body)).await?;
    read_json(resp).await
}

/// Fetch the authenticated user's profile.
///
/// A 404 means the profile is not yet provisioned and maps to an empty
/// profile. That tolerance is specific to this endpoint — other calls
/// surface 404s as errors.
pub async fn fetch_profile(client: &ApiClient) -> Result<UserProfile, ApiError> {
    match client.send(ApiRequest::get("/users/me")).await {
        Ok(resp) => read_json(resp).await,
        Err(ApiError::Upstream { status: 404, .. }) => Ok(UserProfile::default()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
