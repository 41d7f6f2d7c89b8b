// src/web/auth.rs

//! Request extractors for bearer-token authentication. Extraction runs before
//! the handler body, so a rejected request never reaches a store.

use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::services::Claims;
use crate::state::AppState;

/// A caller whose bearer token the identity provider accepted. Missing token
/// maps to 400, rejected token to 403.
#[derive(Debug)]
pub struct VerifiedUser {
  pub claims: Claims,
}

/// Guard for the catalog write surface. Whether writes demand verification is
/// an explicit configuration decision (`CATALOG_WRITE_AUTH`); when disabled
/// the guard passes every request through.
#[derive(Debug)]
pub struct CatalogWriteGuard {
  pub claims: Option<Claims>,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .cloned()
    .ok_or_else(|| AppError::Internal("application state is not configured".to_string()))
}

impl FromRequest for VerifiedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = app_state(req);
    let token = bearer_token(req);

    Box::pin(async move {
      let state = state?;
      let token = token.ok_or_else(|| {
        warn!("Request without bearer token on an authenticated route");
        AppError::TokenMissing
      })?;
      let claims = state.verifier.verify(&token).await?;
      Ok(VerifiedUser { claims })
    })
  }
}

impl FromRequest for CatalogWriteGuard {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

  fn from_request(req: &HttpRequest, payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = app_state(req);
    let user = VerifiedUser::from_request(req, payload);

    Box::pin(async move {
      let state = state?;
      if !state.config.catalog_write_auth {
        return Ok(CatalogWriteGuard { claims: None });
      }
      let verified = user.await?;
      Ok(CatalogWriteGuard {
        claims: Some(verified.claims),
      })
    })
  }
}
