// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed wrappers for the shop backend's endpoints.
//!
//! Everything here dispatches through [`crate::dispatch::ApiClient::send`],
//! so renewal and sign-out behavior is uniform across services. Payload
//! shapes mirror the backend's DTOs (camelCase JSON).

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use crate::error::ApiError;

/// Decode a response body into `T`, mapping parse failures to a transport
/// error (the bytes never made it to the caller intact).
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ApiError> {
    resp.json()
        .await
        .map_err(|e| ApiError::Transport(format!("decode response body: {e}")))
}
