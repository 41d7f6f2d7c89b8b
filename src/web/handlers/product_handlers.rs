// src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{ProductUpdate, UpdateProductRequest};
use crate::state::AppState;
use crate::web::auth::{CatalogWriteGuard, VerifiedUser};

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.documents.list_products().await?;
  info!("Fetched {} products from the display catalog.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match app_state.documents.fetch_product(&product_id).await? {
    Some(mut fields) => {
      fields.insert("id".to_string(), Value::from(product_id));
      Ok(HttpResponse::Ok().json(json!({
        "message": "Product fetched successfully.",
        "product": fields,
      })))
    }
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

#[instrument(
  name = "handler::update_product",
  skip(app_state, path, payload, _guard),
  fields(product_id = %path.as_ref())
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<UpdateProductRequest>,
  _guard: CatalogWriteGuard,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  // Coerce the untyped payload exactly once; both store writers consume the
  // resulting command.
  let update = ProductUpdate::parse(payload.into_inner())?;
  let updated = app_state.catalog.update_product(&product_id, update).await?;

  info!("Product {} updated in both stores.", product_id);
  Ok(HttpResponse::Ok().json(json!({
    "message": "Product updated successfully.",
    "product": updated,
  })))
}

#[instrument(
  name = "handler::delete_product",
  skip(app_state, path, _guard),
  fields(product_id = %path.as_ref())
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  _guard: CatalogWriteGuard,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let deleted = app_state.catalog.delete_product(&product_id).await?;

  info!("Product {} deleted from both stores.", product_id);
  Ok(HttpResponse::Ok().json(json!({
    "message": "Product deleted successfully.",
    "product": deleted,
  })))
}

#[instrument(name = "handler::reconcile_catalog", skip(app_state, user), fields(uid = %user.claims.uid))]
pub async fn reconcile_catalog_handler(
  app_state: web::Data<AppState>,
  user: VerifiedUser,
) -> Result<HttpResponse, AppError> {
  let report = app_state.catalog.reconcile().await?;
  Ok(HttpResponse::Ok().json(report))
}
