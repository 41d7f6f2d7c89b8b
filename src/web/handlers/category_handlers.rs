// src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::{json, Map, Value};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::CatalogWriteGuard;

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.documents.list_categories().await?;
  info!("Fetched {} categories.", categories.len());
  Ok(HttpResponse::Ok().json(categories))
}

// Categories live only in the document store, so this is a single-store merge
// update of whatever fields the caller sent.
#[instrument(
  name = "handler::update_category",
  skip(app_state, path, payload, _guard),
  fields(category_id = %path.as_ref())
)]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<Map<String, Value>>,
  _guard: CatalogWriteGuard,
) -> Result<HttpResponse, AppError> {
  let category_id = path.into_inner();
  app_state.documents.update_category(&category_id, &payload).await?;

  info!("Category {} updated.", category_id);
  Ok(HttpResponse::Ok().json(json!({ "message": "Category updated successfully." })))
}

#[instrument(
  name = "handler::delete_category",
  skip(app_state, path, _guard),
  fields(category_id = %path.as_ref())
)]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  _guard: CatalogWriteGuard,
) -> Result<HttpResponse, AppError> {
  let category_id = path.into_inner();
  app_state.documents.delete_category(&category_id).await?;

  info!("Category {} deleted.", category_id);
  Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully." })))
}
