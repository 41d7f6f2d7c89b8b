// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::VerifiedUser;

#[instrument(name = "handler::list_carts", skip(app_state, user), fields(uid = %user.claims.uid))]
pub async fn list_carts_handler(
  app_state: web::Data<AppState>,
  user: VerifiedUser,
) -> Result<HttpResponse, AppError> {
  let carts = app_state.carts.list_enriched_carts().await?;
  info!("Returning {} enriched carts.", carts.len());
  Ok(HttpResponse::Ok().json(carts))
}
