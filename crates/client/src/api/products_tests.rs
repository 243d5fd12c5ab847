// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::session::SessionStore;

use super::*;

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn client(addr: SocketAddr) -> ApiClient {
    crate::test_support::ensure_crypto();
    ApiClient::new(&format!("http://{addr}"), Arc::new(SessionStore::new(None)))
}

#[tokio::test]
async fn list_decodes_backend_payload() {
    let app = Router::new().route(
        "/products",
        get(|| async {
            Json(serde_json::json!([
                { "id": 1, "name": "Espresso beans", "price": 12.5, "category": "coffee" },
                { "id": 2, "name": "Mug", "price": 4.0 },
            ]))
        }),
    );
    let client = client(serve(app).await);

    let products = list(&client).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Espresso beans");
    assert_eq!(products[0].category.as_deref(), Some("coffee"));
    assert!(products[1].category.is_none());
}

#[tokio::test]
async fn backend_errors_pass_through() {
    let app = Router::new().route(
        "/products",
        get(|| async { (StatusCode::BAD_REQUEST, "category is required") }),
    );
    let client = client(serve(app).await);

    let err = list(&client).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}
