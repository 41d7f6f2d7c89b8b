// src/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{CartView, CatalogSync, IdentityVerifier};
use crate::stores::{DocumentCatalog, RelationalCatalog};

#[derive(Clone)]
pub struct AppState {
  pub catalog: CatalogSync,
  pub carts: CartView,
  pub relational: Arc<dyn RelationalCatalog>,
  pub documents: Arc<dyn DocumentCatalog>,
  pub verifier: Arc<dyn IdentityVerifier>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(
    relational: Arc<dyn RelationalCatalog>,
    documents: Arc<dyn DocumentCatalog>,
    verifier: Arc<dyn IdentityVerifier>,
    config: Arc<AppConfig>,
  ) -> Self {
    Self {
      catalog: CatalogSync::new(relational.clone(), documents.clone()),
      carts: CartView::new(relational.clone(), documents.clone()),
      relational,
      documents,
      verifier,
      config,
    }
  }
}
