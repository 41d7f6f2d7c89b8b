// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::VerifiedUser;

#[instrument(name = "handler::list_orders", skip(app_state, user), fields(uid = %user.claims.uid))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  user: VerifiedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.relational.list_orders().await?;
  if orders.is_empty() {
    warn!("Order listing requested but no orders exist.");
    return Err(AppError::NotFound("No orders found".to_string()));
  }

  info!("Returning {} orders, newest first.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}
