// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::types::Json;

use emporium::config::AppConfig;
use emporium::errors::AppError;
use emporium::models::{Cart, CartProduct, CustomerOrder, Product, ProductUpdate, UpdateProductRequest};
use emporium::services::{Claims, IdentityVerifier};
use emporium::state::AppState;
use emporium::stores::{DocumentCatalog, DocumentFields, RelationalCatalog};

// --- Sample data -----------------------------------------------------------

pub fn sample_product(id: &str, version: i64) -> Product {
  let ts = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
  Product {
    id: id.to_string(),
    product_name: format!("Product {}", id),
    brand: "Atlas".to_string(),
    price: 100.0,
    market_price: 120.0,
    percentage_of_discount_offered: 10.0,
    stock: 3,
    category: "kitchen".to_string(),
    description: "desc".to_string(),
    seller: "Atlas Retail".to_string(),
    delivery_info: "Ships in 2 days".to_string(),
    emi: false,
    images: vec!["https://img.example/a.jpg".to_string()],
    manufacturing_date: ts,
    expiry_date: ts,
    listing_date: ts,
    version,
    created_at: ts,
    updated_at: ts,
  }
}

pub fn sample_cart(id: i32, user_id: &str, items: Vec<CartProduct>, total: &str) -> Cart {
  let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
  Cart {
    id,
    user_id: user_id.to_string(),
    products: Json(items),
    total_cart_value: total.parse::<Decimal>().unwrap(),
    is_paid: false,
    created_at: ts,
    updated_at: ts,
  }
}

pub fn cart_item(product_id: &str, quantity: i32, price: f64) -> CartProduct {
  CartProduct {
    product_id: product_id.to_string(),
    quantity,
    price,
  }
}

pub fn sample_order(order_number: i32) -> CustomerOrder {
  let ts = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
  CustomerOrder {
    order_number,
    customer_name: "R. Iyer".to_string(),
    apartment: "4B".to_string(),
    block: "C".to_string(),
    locality: "Indiranagar".to_string(),
    city: "Bengaluru".to_string(),
    state: "KA".to_string(),
    pincode: "560038".to_string(),
    email: "r.iyer@example.com".to_string(),
    mobile: "9900000000".to_string(),
    order_total: "2499.00".parse().unwrap(),
    order_items: Json(json!([{ "productId": "42", "quantity": 1 }])),
    created_at: ts,
    updated_at: ts,
  }
}

/// A full, well-formed update payload with string-typed numerics, the way the
/// admin UI submits them.
pub fn update_request() -> UpdateProductRequest {
  serde_json::from_value(update_request_json()).unwrap()
}

pub fn update_request_json() -> Value {
  json!({
    "productName": "Atlas Blender 900W",
    "brand": "Atlas",
    "price": "199.99",
    "marketPrice": "249.00",
    "percentageOfDiscountOffered": "20",
    "stock": "5",
    "category": "kitchen",
    "description": "Glass jar, 3 speeds",
    "seller": "Atlas Retail",
    "deliveryInfo": "Ships in 2 days",
    "emi": "false",
    "images": ["https://img.example/a.jpg"],
    "manufacturingDate": "2025-01-15",
    "expiryDate": "2027-01-15",
    "listingDate": "2025-02-01",
  })
}

pub fn parsed_update() -> ProductUpdate {
  ProductUpdate::parse(update_request()).unwrap()
}

// --- Fake relational store -------------------------------------------------

#[derive(Default)]
pub struct FakeRelational {
  pub products: Mutex<HashMap<String, Product>>,
  pub carts: Mutex<Vec<Cart>>,
  pub orders: Mutex<Vec<CustomerOrder>>,
  pub fail_writes: AtomicBool,
  pub calls: Mutex<Vec<String>>,
}

impl FakeRelational {
  pub fn with_products(products: Vec<Product>) -> Self {
    let store = Self::default();
    {
      let mut map = store.products.lock().unwrap();
      for p in products {
        map.insert(p.id.clone(), p);
      }
    }
    store
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  fn injected_failure() -> AppError {
    AppError::Persistence(sqlx::Error::PoolClosed)
  }

  fn record(&self, call: impl Into<String>) {
    self.calls.lock().unwrap().push(call.into());
  }
}

#[async_trait]
impl RelationalCatalog for FakeRelational {
  async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<Product, AppError> {
    self.record(format!("update_product {}", id));
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(Self::injected_failure());
    }

    let mut products = self.products.lock().unwrap();
    let Some(existing) = products.get_mut(id) else {
      return Err(AppError::Persistence(sqlx::Error::RowNotFound));
    };
    if let Some(expected) = update.expected_version {
      if existing.version != expected {
        return Err(AppError::VersionConflict {
          entity: "product",
          id: id.to_string(),
          expected,
        });
      }
    }

    existing.product_name = update.product_name.clone();
    existing.brand = update.brand.clone();
    existing.price = update.price;
    existing.market_price = update.market_price;
    existing.percentage_of_discount_offered = update.percentage_of_discount_offered;
    existing.stock = update.stock;
    existing.category = update.category.clone();
    existing.description = update.description.clone();
    existing.seller = update.seller.clone();
    existing.delivery_info = update.delivery_info.clone();
    existing.emi = update.emi;
    existing.images = update.images.clone();
    existing.manufacturing_date = update.manufacturing_date;
    existing.expiry_date = update.expiry_date;
    existing.listing_date = update.listing_date;
    existing.version += 1;
    existing.updated_at = Utc::now();
    Ok(existing.clone())
  }

  async fn delete_product(&self, id: &str) -> Result<Product, AppError> {
    self.record(format!("delete_product {}", id));
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(Self::injected_failure());
    }
    self
      .products
      .lock()
      .unwrap()
      .remove(id)
      .ok_or(AppError::Persistence(sqlx::Error::RowNotFound))
  }

  async fn list_products(&self) -> Result<Vec<Product>, AppError> {
    self.record("list_products");
    let mut products: Vec<Product> = self.products.lock().unwrap().values().cloned().collect();
    products.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(products)
  }

  async fn list_carts(&self) -> Result<Vec<Cart>, AppError> {
    self.record("list_carts");
    Ok(self.carts.lock().unwrap().clone())
  }

  async fn list_orders(&self) -> Result<Vec<CustomerOrder>, AppError> {
    self.record("list_orders");
    Ok(self.orders.lock().unwrap().clone())
  }
}

// --- Fake document store ---------------------------------------------------

#[derive(Default)]
pub struct FakeDocuments {
  pub products: Mutex<HashMap<String, DocumentFields>>,
  pub categories: Mutex<HashMap<String, DocumentFields>>,
  pub fail_product_writes: AtomicBool,
  pub fail_product_reads: Mutex<HashSet<String>>,
  pub calls: Mutex<Vec<String>>,
}

impl FakeDocuments {
  pub fn with_product(id: &str, fields: Value) -> Self {
    let store = Self::default();
    store.insert_product(id, fields);
    store
  }

  pub fn insert_product(&self, id: &str, fields: Value) {
    let Value::Object(map) = fields else {
      panic!("product fields must be a JSON object");
    };
    self.products.lock().unwrap().insert(id.to_string(), map);
  }

  pub fn fail_reads_for(&self, id: &str) {
    self.fail_product_reads.lock().unwrap().insert(id.to_string());
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  pub fn product_field(&self, id: &str, field: &str) -> Option<Value> {
    self
      .products
      .lock()
      .unwrap()
      .get(id)
      .and_then(|fields| fields.get(field))
      .cloned()
  }

  fn record(&self, call: impl Into<String>) {
    self.calls.lock().unwrap().push(call.into());
  }
}

#[async_trait]
impl DocumentCatalog for FakeDocuments {
  async fn fetch_product(&self, id: &str) -> Result<Option<DocumentFields>, AppError> {
    self.record(format!("fetch_product {}", id));
    if self.fail_product_reads.lock().unwrap().contains(id) {
      return Err(AppError::DocumentStore("injected read failure".to_string()));
    }
    Ok(self.products.lock().unwrap().get(id).cloned())
  }

  async fn list_products(&self) -> Result<Vec<Value>, AppError> {
    self.record("list_products");
    let products = self.products.lock().unwrap();
    let mut ids: Vec<&String> = products.keys().collect();
    ids.sort();
    Ok(
      ids
        .into_iter()
        .map(|id| {
          let mut fields = products[id].clone();
          fields.insert("id".to_string(), Value::from(id.as_str()));
          Value::Object(fields)
        })
        .collect(),
    )
  }

  async fn write_product(&self, id: &str, fields: &DocumentFields) -> Result<(), AppError> {
    self.record(format!("write_product {}", id));
    if self.fail_product_writes.load(Ordering::SeqCst) {
      return Err(AppError::DocumentStore("injected write failure".to_string()));
    }
    let mut products = self.products.lock().unwrap();
    let entry = products.entry(id.to_string()).or_default();
    for (key, value) in fields {
      entry.insert(key.clone(), value.clone());
    }
    Ok(())
  }

  async fn delete_product(&self, id: &str) -> Result<(), AppError> {
    self.record(format!("delete_product {}", id));
    if self.fail_product_writes.load(Ordering::SeqCst) {
      return Err(AppError::DocumentStore("injected delete failure".to_string()));
    }
    self.products.lock().unwrap().remove(id);
    Ok(())
  }

  async fn list_categories(&self) -> Result<Vec<Value>, AppError> {
    self.record("list_categories");
    let categories = self.categories.lock().unwrap();
    Ok(
      categories
        .iter()
        .map(|(id, fields)| {
          let mut fields = fields.clone();
          fields.insert("id".to_string(), Value::from(id.as_str()));
          Value::Object(fields)
        })
        .collect(),
    )
  }

  async fn update_category(&self, id: &str, fields: &DocumentFields) -> Result<(), AppError> {
    self.record(format!("update_category {}", id));
    let mut categories = self.categories.lock().unwrap();
    let Some(entry) = categories.get_mut(id) else {
      return Err(AppError::DocumentStore(format!("category {} does not exist", id)));
    };
    for (key, value) in fields {
      entry.insert(key.clone(), value.clone());
    }
    Ok(())
  }

  async fn delete_category(&self, id: &str) -> Result<(), AppError> {
    self.record(format!("delete_category {}", id));
    self.categories.lock().unwrap().remove(id);
    Ok(())
  }
}

// --- Fake identity verifier ------------------------------------------------

pub const VALID_TOKEN: &str = "valid-admin-token";

#[derive(Default)]
pub struct FakeVerifier {
  pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
  async fn verify(&self, token: &str) -> Result<Claims, AppError> {
    self.calls.lock().unwrap().push(token.to_string());
    if token == VALID_TOKEN {
      Ok(Claims {
        uid: "admin-1".to_string(),
        email: Some("admin@example.com".to_string()),
      })
    } else {
      Err(AppError::Auth("token rejected by identity provider".to_string()))
    }
  }
}

// --- App state wiring ------------------------------------------------------

pub fn test_config(catalog_write_auth: bool) -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "postgres://unused".to_string(),
    firestore_project_id: "test".to_string(),
    firestore_base_url: "http://unused".to_string(),
    firestore_auth_token: None,
    identity_base_url: "http://unused".to_string(),
    identity_api_key: "unused".to_string(),
    catalog_write_auth,
  }
}

pub fn app_state(
  relational: Arc<FakeRelational>,
  documents: Arc<FakeDocuments>,
  verifier: Arc<FakeVerifier>,
  catalog_write_auth: bool,
) -> AppState {
  AppState::new(relational, documents, verifier, Arc::new(test_config(catalog_write_auth)))
}
