// src/services/cart_view.rs

//! Builds the administrative cart listing: every cart row, with each line item
//! overlaid with current display data from the document store. All lookups
//! across all carts run concurrently; an individual lookup failure only drops
//! that line item.

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{Map, Value};
use tracing::{instrument, warn};

use crate::errors::AppError;
use crate::models::{Cart, CartProduct, EnrichedCart};
use crate::stores::{DocumentCatalog, RelationalCatalog};

/// Per-item lookup outcome. `Missing` is the expected case of a product that
/// was deleted after being added to a cart; `Failed` is a store error that is
/// logged and otherwise treated the same way.
enum ItemLookup {
  Present(Value),
  Missing,
  Failed,
}

#[derive(Clone)]
pub struct CartView {
  relational: Arc<dyn RelationalCatalog>,
  documents: Arc<dyn DocumentCatalog>,
}

impl CartView {
  pub fn new(relational: Arc<dyn RelationalCatalog>, documents: Arc<dyn DocumentCatalog>) -> Self {
    Self { relational, documents }
  }

  /// Returns every cart with its enriched (possibly shortened) item list and
  /// the stored total unchanged. Zero cart rows is reported as `NotFound` so
  /// callers can tell an empty catalog from a transient failure.
  #[instrument(name = "carts::list_enriched", skip(self))]
  pub async fn list_enriched_carts(&self) -> Result<Vec<EnrichedCart>, AppError> {
    let carts = self.relational.list_carts().await?;
    if carts.is_empty() {
      return Err(AppError::NotFound("No carts found".to_string()));
    }

    let enriched = join_all(carts.into_iter().map(|cart| self.enrich_cart(cart))).await;
    Ok(enriched)
  }

  async fn enrich_cart(&self, cart: Cart) -> EnrichedCart {
    let lookups = join_all(cart.products.0.iter().map(|item| self.lookup_item(cart.id, item))).await;
    let products = lookups
      .into_iter()
      .filter_map(|lookup| match lookup {
        ItemLookup::Present(item) => Some(item),
        ItemLookup::Missing | ItemLookup::Failed => None,
      })
      .collect();

    EnrichedCart {
      id: cart.id,
      user_id: cart.user_id,
      products,
      total_cart_value: cart.total_cart_value,
      is_paid: cart.is_paid,
      created_at: cart.created_at,
      updated_at: cart.updated_at,
    }
  }

  async fn lookup_item(&self, cart_id: i32, item: &CartProduct) -> ItemLookup {
    match self.documents.fetch_product(&item.product_id).await {
      Ok(Some(details)) => ItemLookup::Present(merge_item(item, details)),
      Ok(None) => ItemLookup::Missing,
      Err(err) => {
        warn!(cart_id, product_id = %item.product_id, error = %err, "Cart item lookup failed");
        ItemLookup::Failed
      }
    }
  }
}

// The stored line item overlaid with the document's display fields; document
// fields win on name collisions (notably `price`, which the storefront keeps
// current in the display copy).
fn merge_item(item: &CartProduct, details: Map<String, Value>) -> Value {
  let mut merged = Map::new();
  merged.insert("productId".to_string(), Value::from(item.product_id.clone()));
  merged.insert("quantity".to_string(), Value::from(item.quantity));
  merged.insert("price".to_string(), Value::from(item.price));
  for (key, value) in details {
    merged.insert(key, value);
  }
  Value::Object(merged)
}
