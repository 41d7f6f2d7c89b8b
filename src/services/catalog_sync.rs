// src/services/catalog_sync.rs

//! Coordinates product writes across the two stores. The relational store is
//! always mutated first; the document store never reflects a change whose
//! relational phase failed. There is no cross-store transaction: a document
//! phase failure leaves the relational change durable and is reported as a
//! partial write, never rolled back.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{Product, ProductUpdate};
use crate::stores::{DocumentCatalog, RelationalCatalog};

#[derive(Clone)]
pub struct CatalogSync {
  relational: Arc<dyn RelationalCatalog>,
  documents: Arc<dyn DocumentCatalog>,
}

/// Outcome of a reconciliation sweep over the product catalog.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
  pub checked: usize,
  pub repaired: Vec<String>,
  pub failed: Vec<String>,
}

enum ReconcileOutcome {
  UpToDate,
  Repaired(String),
  Failed(String),
}

impl CatalogSync {
  pub fn new(relational: Arc<dyn RelationalCatalog>, documents: Arc<dyn DocumentCatalog>) -> Self {
    Self { relational, documents }
  }

  /// Applies a validated update to the relational row, then mirrors the same
  /// field set (plus the new version) into the document store.
  #[instrument(name = "catalog::update_product", skip(self, update))]
  pub async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product, AppError> {
    let updated = self.relational.update_product(id, &update).await?;
    info!(id, version = updated.version, "Product updated in relational store");

    let fields = update.document_fields(updated.version);
    if let Err(err) = self.documents.write_product(id, &fields).await {
      warn!(id, error = %err, "Document mirror failed after relational update");
      return Err(AppError::PartialWrite {
        detail: format!(
          "product {} was updated in the primary catalog, but its display copy could not be \
           refreshed and is stale until the catalog is reconciled",
          id
        ),
      });
    }

    Ok(updated)
  }

  /// Deletes the relational row, then the document copy. A document phase
  /// failure leaves a stale record visible in the display catalog; the caller
  /// is told the primary deletion committed.
  #[instrument(name = "catalog::delete_product", skip(self))]
  pub async fn delete_product(&self, id: &str) -> Result<Product, AppError> {
    let deleted = self.relational.delete_product(id).await?;
    info!(id, "Product deleted from relational store");

    if let Err(err) = self.documents.delete_product(id).await {
      warn!(id, error = %err, "Document delete failed after relational delete");
      return Err(AppError::PartialWrite {
        detail: format!(
          "product {} was deleted from the primary catalog, but its display copy could not be \
           removed and may still appear until the catalog is reconciled",
          id
        ),
      });
    }

    Ok(deleted)
  }

  /// Sweeps the whole catalog and repairs document copies that are missing or
  /// carry an older version than the relational row. Copies that are already
  /// current (or newer, meaning a concurrent write is in flight) are left
  /// alone.
  #[instrument(name = "catalog::reconcile", skip(self))]
  pub async fn reconcile(&self) -> Result<ReconcileReport, AppError> {
    let products = self.relational.list_products().await?;
    let checked = products.len();

    let sweeps = products.into_iter().map(|product| self.reconcile_one(product));
    let outcomes = join_all(sweeps).await;

    let mut report = ReconcileReport {
      checked,
      ..ReconcileReport::default()
    };
    for outcome in outcomes {
      match outcome {
        ReconcileOutcome::UpToDate => {}
        ReconcileOutcome::Repaired(id) => report.repaired.push(id),
        ReconcileOutcome::Failed(id) => report.failed.push(id),
      }
    }

    info!(
      checked = report.checked,
      repaired = report.repaired.len(),
      failed = report.failed.len(),
      "Catalog reconciliation finished"
    );
    Ok(report)
  }

  async fn reconcile_one(&self, product: Product) -> ReconcileOutcome {
    let id = product.id.clone();
    let doc = match self.documents.fetch_product(&id).await {
      Ok(doc) => doc,
      Err(err) => {
        warn!(id = %id, error = %err, "Reconcile could not read document copy");
        return ReconcileOutcome::Failed(id);
      }
    };

    let doc_version = doc
      .as_ref()
      .and_then(|fields| fields.get("version"))
      .and_then(Value::as_i64)
      .unwrap_or(0);
    if doc.is_some() && doc_version >= product.version {
      return ReconcileOutcome::UpToDate;
    }

    let fields = product.document_fields();
    match self.documents.write_product(&id, &fields).await {
      Ok(()) => {
        info!(id = %id, from_version = doc_version, to_version = product.version, "Document copy repaired");
        ReconcileOutcome::Repaired(id)
      }
      Err(err) => {
        warn!(id = %id, error = %err, "Reconcile could not rewrite document copy");
        ReconcileOutcome::Failed(id)
      }
    }
  }
}
