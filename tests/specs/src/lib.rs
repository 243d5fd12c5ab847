// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Spawns the real `shopfront` binary as a subprocess and points it at
//! an in-process stub of the shop backend.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Once;

use axum::extract::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tokio::net::TcpListener;

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Safe to call multiple times — only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Resolve the path to the compiled `shopfront` binary.
pub fn shopfront_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("shopfront")
}

/// Build an unsigned JWT carrying `sub` and a roles claim. The client
/// never verifies signatures, so a fixed dummy segment is enough.
pub fn jwt(sub: &str, roles: &[&str]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "sub": sub, "roles": roles, "exp": 4_000_000_000u64 }).to_string(),
    );
    format!("{header}.{payload}.c2ln")
}

const USERNAME: &str = "alice";
const PASSWORD: &str = "hunter2";

/// An in-process stand-in for the shop backend, bound to a random port.
pub struct StubShop {
    addr: SocketAddr,
}

impl StubShop {
    pub async fn start() -> anyhow::Result<Self> {
        let token = jwt(USERNAME, &["ROLE_CUSTOMER"]);

        let app = Router::new()
            .route(
                "/api/auth/login",
                post(move |Json(body): Json<serde_json::Value>| {
                    let token = token.clone();
                    async move {
                        if body["username"] == USERNAME && body["password"] == PASSWORD {
                            Json(serde_json::json!({
                                "accessToken": token,
                                "refreshToken": "refresh-1",
                            }))
                            .into_response()
                        } else {
                            (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
                        }
                    }
                }),
            )
            .route(
                "/api/products",
                get(|| async {
                    Json(serde_json::json!([
                        { "id": 1, "name": "Espresso beans", "price": 12.5, "category": "coffee" },
                    ]))
                }),
            )
            .route(
                "/api/users/me",
                get(|headers: HeaderMap| async move {
                    if headers.contains_key("authorization") {
                        Json(serde_json::json!({
                            "userId": 1,
                            "username": USERNAME,
                            "email": "alice@example.com",
                            "customerId": 10,
                            "roles": ["ROLE_CUSTOMER"],
                        }))
                        .into_response()
                    } else {
                        (StatusCode::UNAUTHORIZED, "missing token").into_response()
                    }
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr })
    }

    /// Base URL for the stub, including the `/api` prefix.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }
}

/// Run the `shopfront` binary with the given arguments and credentials
/// file, returning `(exit_ok, stdout)`.
pub async fn run_shopfront(
    api_url: &str,
    credentials: &Path,
    args: &[&str],
) -> anyhow::Result<(bool, String)> {
    ensure_crypto();
    let binary = shopfront_binary();
    anyhow::ensure!(binary.exists(), "shopfront binary not found at {}", binary.display());

    let output = tokio::process::Command::new(&binary)
        .arg("--api-url")
        .arg(api_url)
        .arg("--credentials")
        .arg(credentials)
        .args(args)
        .output()
        .await?;

    Ok((output.status.success(), String::from_utf8_lossy(&output.stdout).into_owned()))
}
