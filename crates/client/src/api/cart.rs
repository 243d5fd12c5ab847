// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shopping cart endpoints.

use serde::{Deserialize, Serialize};

use crate::dispatch::{ApiClient, ApiRequest};
use crate::error::ApiError;

use super::orders::Order;
use super::read_json;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: i64,
    pub quantity: i64,
}

pub async fn fetch(client: &ApiClient, customer_id: i64) -> Result<Cart, ApiError> {
    let resp = client.send(ApiRequest::get(format!("/cart/{customer_id}"))).await?;
    read_json(resp).await
}

pub async fn add_item(
    client: &ApiClient,
    customer_id: i64,
    item: &NewCartItem,
) -> Result<Cart, ApiError> {
    let resp = client
        .send(ApiRequest::post(format!("/cart/{customer_id}/items")).json(item))
        .await?;
    read_json(resp).await
}

/// Set a cart line's quantity. Zero removes the line on the backend.
pub async fn update_item(
    client: &ApiClient,
    customer_id: i64,
    product_id: i64,
    quantity: i64,
) -> Result<Cart, ApiError> {
    let resp = client
        .send(
            ApiRequest::put(format!("/cart/{customer_id}/items/{product_id}"))
                .query("quantity", quantity),
        )
        .await?;
    read_json(resp).await
}

pub async fn remove_item(
    client: &ApiClient,
    customer_id: i64,
    product_id: i64,
) -> Result<Cart, ApiError> {
    let resp = client
        .send(ApiRequest::delete(format!("/cart/{customer_id}/items/{product_id}")))
        .await?;
    read_json(resp).await
}

/// Convert a cart into an order and clear the cart.
pub async fn checkout(client: &ApiClient, cart_id: i64) -> Result<Order, ApiError> {
    let resp = client.send(ApiRequest::post(format!("/cart/{cart_id}/checkout"))).await?;
    read_json(resp).await
}

#[cfg(test)]
#[path = "cart_tests.rs"]
mod tests;
