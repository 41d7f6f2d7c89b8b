// src/stores/relational.rs

//! sqlx-backed relational store client. Products are canonical here; carts and
//! orders are read-only for this service.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, instrument};

use crate::errors::AppError;
use crate::models::{Cart, CustomerOrder, Product, ProductUpdate};
use crate::stores::RelationalCatalog;

const PRODUCT_COLUMNS: &str = "id, product_name, brand, price, market_price, \
   percentage_of_discount_offered, stock, category, description, seller, delivery_info, emi, \
   images, manufacturing_date, expiry_date, listing_date, version, created_at, updated_at";

#[derive(Clone)]
pub struct PgCatalog {
  pool: PgPool,
}

impl PgCatalog {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  fn db_error(context: &str, err: sqlx::Error) -> AppError {
    error!(error = %err, "Relational store operation failed: {}", context);
    AppError::Persistence(err)
  }
}

#[async_trait]
impl RelationalCatalog for PgCatalog {
  #[instrument(name = "relational::update_product", skip(self, update))]
  async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<Product, AppError> {
    let guard = if update.expected_version.is_some() {
      " AND version = $17"
    } else {
      ""
    };
    let sql = format!(
      "UPDATE products SET product_name = $2, brand = $3, price = $4, market_price = $5, \
       percentage_of_discount_offered = $6, stock = $7, category = $8, description = $9, \
       seller = $10, delivery_info = $11, emi = $12, images = $13, manufacturing_date = $14, \
       expiry_date = $15, listing_date = $16, version = version + 1, updated_at = now() \
       WHERE id = $1{} RETURNING {}",
      guard, PRODUCT_COLUMNS
    );

    let mut query = sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .bind(&update.product_name)
      .bind(&update.brand)
      .bind(update.price)
      .bind(update.market_price)
      .bind(update.percentage_of_discount_offered)
      .bind(update.stock)
      .bind(&update.category)
      .bind(&update.description)
      .bind(&update.seller)
      .bind(&update.delivery_info)
      .bind(update.emi)
      .bind(&update.images)
      .bind(update.manufacturing_date)
      .bind(update.expiry_date)
      .bind(update.listing_date);
    if let Some(expected) = update.expected_version {
      query = query.bind(expected);
    }

    let row = query
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| Self::db_error("update product", e))?;

    match row {
      Some(product) => Ok(product),
      None => match update.expected_version {
        // Tell a stale guard apart from a row that is gone entirely.
        Some(expected) => {
          let current: Option<i64> = sqlx::query_scalar("SELECT version FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("probe product version", e))?;
          match current {
            Some(_) => Err(AppError::VersionConflict {
              entity: "product",
              id: id.to_string(),
              expected,
            }),
            None => Err(Self::db_error("update product", sqlx::Error::RowNotFound)),
          }
        }
        None => Err(Self::db_error("update product", sqlx::Error::RowNotFound)),
      },
    }
  }

  #[instrument(name = "relational::delete_product", skip(self))]
  async fn delete_product(&self, id: &str) -> Result<Product, AppError> {
    let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {}", PRODUCT_COLUMNS);
    sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| Self::db_error("delete product", e))?
      .ok_or_else(|| Self::db_error("delete product", sqlx::Error::RowNotFound))
  }

  #[instrument(name = "relational::list_products", skip(self))]
  async fn list_products(&self) -> Result<Vec<Product>, AppError> {
    let sql = format!("SELECT {} FROM products ORDER BY product_name ASC", PRODUCT_COLUMNS);
    sqlx::query_as::<_, Product>(&sql)
      .fetch_all(&self.pool)
      .await
      .map_err(|e| Self::db_error("list products", e))
  }

  #[instrument(name = "relational::list_carts", skip(self))]
  async fn list_carts(&self) -> Result<Vec<Cart>, AppError> {
    sqlx::query_as::<_, Cart>(
      "SELECT id, user_id, products, total_cart_value, is_paid, created_at, updated_at \
       FROM carts ORDER BY id ASC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| Self::db_error("list carts", e))
  }

  #[instrument(name = "relational::list_orders", skip(self))]
  async fn list_orders(&self) -> Result<Vec<CustomerOrder>, AppError> {
    sqlx::query_as::<_, CustomerOrder>(
      "SELECT order_number, customer_name, apartment, block, locality, city, state, pincode, \
       email, mobile, order_total, order_items, created_at, updated_at \
       FROM customer_orders ORDER BY created_at DESC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| Self::db_error("list orders", e))
  }
}
