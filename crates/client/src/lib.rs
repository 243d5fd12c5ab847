// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shopfront: authenticated storefront API client.
//!
//! Wraps the shop backend's REST API behind a bearer-token dispatcher that
//! renews expired access credentials transparently: concurrent requests that
//! hit a 401 share a single refresh call and replay once it settles.

pub mod api;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod session;

#[cfg(test)]
mod test_support;
