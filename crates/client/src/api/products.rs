// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Product catalog endpoints.

use serde::{Deserialize, Serialize};

use crate::dispatch::{ApiClient, ApiRequest};
use crate::error::ApiError;

use super::read_json;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Payload for creating or updating a product (admin only).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stock_quantity: i64,
    pub category: String,
}

pub async fn list(client: &ApiClient) -> Result<Vec<Product>, ApiError> {
    let resp = client.send(ApiRequest::get("/products")).await?;
    read_json(resp).await
}

pub async fn create(client: &ApiClient, product: &NewProduct) -> Result<Product, ApiError> {
    let resp = client.send(ApiRequest::post("/products").json(product)).await?;
    read_json(resp).await
}

pub async fn update(
    client: &ApiClient,
    product_id: i64,
    product: &NewProduct,
) -> Result<Product, ApiError> {
    let resp = client
        .send(ApiRequest::put(format!("/products/{product_id}")).json(product))
        .await?;
    read_json(resp).await
}

pub async fn remove(client: &ApiClient, product_id: i64) -> Result<(), ApiError> {
    client.send(ApiRequest::delete(format!("/products/{product_id}"))).await?;
    Ok(())
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
