// src/models/cart.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One line item as stored inside the cart row's embedded product list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
  pub product_id: String,
  pub quantity: i32,
  pub price: f64,
}

/// Cart row. Read-only from this service's perspective; the storefront owns
/// the write path.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub id: i32,
  pub user_id: String,
  pub products: Json<Vec<CartProduct>>,
  pub total_cart_value: Decimal,
  pub is_paid: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A cart whose line items have been overlaid with current display data from
/// the document store. Items whose product no longer exists are omitted; the
/// stored total is reported unchanged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCart {
  pub id: i32,
  pub user_id: String,
  pub products: Vec<serde_json::Value>,
  pub total_cart_value: Decimal,
  pub is_paid: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
