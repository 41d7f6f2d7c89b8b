// src/stores/mod.rs

//! The two database clients behind the catalog. `RelationalCatalog` is the
//! canonical store for products, carts and orders; `DocumentCatalog` holds the
//! denormalized display copies. Both are trait seams so the coordinator and
//! the enrichment service can run against in-process fakes in tests.

pub mod firestore;
pub mod relational;
pub mod value;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::{Cart, CustomerOrder, Product, ProductUpdate};

pub type DocumentFields = Map<String, Value>;

/// Typed access to the relational store.
#[async_trait]
pub trait RelationalCatalog: Send + Sync {
  /// Applies a full-field update and bumps the row version. Fails with
  /// `VersionConflict` when the command carries a stale expected version.
  async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<Product, AppError>;

  /// Deletes the row and returns it.
  async fn delete_product(&self, id: &str) -> Result<Product, AppError>;

  async fn list_products(&self) -> Result<Vec<Product>, AppError>;

  async fn list_carts(&self) -> Result<Vec<Cart>, AppError>;

  async fn list_orders(&self) -> Result<Vec<CustomerOrder>, AppError>;
}

/// Access to the document store's `products` and `categories` collections.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
  /// Returns the product document's fields, or `None` when no document exists.
  async fn fetch_product(&self, id: &str) -> Result<Option<DocumentFields>, AppError>;

  async fn list_products(&self) -> Result<Vec<Value>, AppError>;

  /// Merges the given fields into the product document, creating it if absent.
  async fn write_product(&self, id: &str, fields: &DocumentFields) -> Result<(), AppError>;

  /// Idempotent delete.
  async fn delete_product(&self, id: &str) -> Result<(), AppError>;

  async fn list_categories(&self) -> Result<Vec<Value>, AppError>;

  /// Merges the given fields into an existing category document; fails when
  /// the document does not exist.
  async fn update_category(&self, id: &str, fields: &DocumentFields) -> Result<(), AppError>;

  async fn delete_category(&self, id: &str) -> Result<(), AppError>;
}
