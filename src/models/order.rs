// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Customer order row. Immutable once created; this service only lists them,
/// newest first. `order_items` is an opaque structured payload written by the
/// storefront checkout.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
  pub order_number: i32,
  pub customer_name: String,
  pub apartment: String,
  pub block: String,
  pub locality: String,
  pub city: String,
  pub state: String,
  pub pincode: String,
  pub email: String,
  pub mobile: String,
  pub order_total: Decimal,
  pub order_items: Json<serde_json::Value>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
