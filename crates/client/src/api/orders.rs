// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Order endpoints.

use serde::{Deserialize, Serialize};

use crate::dispatch::{ApiClient, ApiRequest};
use crate::error::ApiError;

use super::read_json;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub total_amount: f64,
    /// Backend order status (e.g. PENDING, SHIPPED). Kept opaque.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub price_at_purchase: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: i64,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
}

pub async fn list(client: &ApiClient) -> Result<Vec<Order>, ApiError> {
    let resp = client.send(ApiRequest::get("/orders")).await?;
    read_json(resp).await
}

pub async fn list_for_customer(
    client: &ApiClient,
    customer_id: i64,
) -> Result<Vec<Order>, ApiError> {
    let resp = client
        .send(ApiRequest::get(format!("/orders/customer/{customer_id}")))
        .await?;
    read_json(resp).await
}

pub async fn create(client: &ApiClient, order: &NewOrder) -> Result<Order, ApiError> {
    let resp = client.send(ApiRequest::post("/orders").json(order)).await?;
    read_json(resp).await
}

pub async fn update_status(
    client: &ApiClient,
    order_id: i64,
    status: &str,
) -> Result<Order, ApiError> {
    let resp = client
        .send(ApiRequest::patch(format!("/orders/{order_id}/status")).query("status", status))
        .await?;
    read_json(resp).await
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
