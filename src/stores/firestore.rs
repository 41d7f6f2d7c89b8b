// src/stores/firestore.rs

//! REST client for the document store. Documents live under
//! `{base}/projects/{project}/databases/(default)/documents/{collection}/{id}`
//! with the typed-value encoding handled by `stores::value`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use tracing::{debug, error, instrument};

use crate::errors::AppError;
use crate::stores::value::{from_fields, to_fields};
use crate::stores::{DocumentCatalog, DocumentFields};

const PRODUCTS: &str = "products";
const CATEGORIES: &str = "categories";
const PAGE_SIZE: u32 = 300;

#[derive(Clone)]
pub struct FirestoreClient {
  http: reqwest::Client,
  base_url: String,
  project_id: String,
  auth_token: Option<String>,
}

impl FirestoreClient {
  pub fn new(http: reqwest::Client, base_url: &str, project_id: &str, auth_token: Option<String>) -> Self {
    Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
      project_id: project_id.to_string(),
      auth_token,
    }
  }

  fn documents_root(&self) -> String {
    format!(
      "{}/projects/{}/databases/(default)/documents",
      self.base_url, self.project_id
    )
  }

  fn document_url(&self, collection: &str, id: &str) -> String {
    format!("{}/{}/{}", self.documents_root(), collection, id)
  }

  fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.auth_token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  fn transport_error(context: &str, err: reqwest::Error) -> AppError {
    error!(error = %err, "Document store request failed: {}", context);
    AppError::DocumentStore(format!("{}: {}", context, err))
  }

  async fn status_error(context: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!(%status, %body, "Document store rejected request: {}", context);
    AppError::DocumentStore(format!("{}: status {}", context, status))
  }

  async fn get_document(&self, collection: &str, id: &str) -> Result<Option<DocumentFields>, AppError> {
    let url = self.document_url(collection, id);
    let response = self
      .authorize(self.http.get(&url))
      .send()
      .await
      .map_err(|e| Self::transport_error("get document", e))?;

    if response.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !response.status().is_success() {
      return Err(Self::status_error("get document", response).await);
    }

    let doc: Value = response
      .json()
      .await
      .map_err(|e| Self::transport_error("decode document", e))?;
    let fields = doc
      .get("fields")
      .and_then(Value::as_object)
      .map(from_fields)
      .unwrap_or_default();
    Ok(Some(fields))
  }

  /// Merge-writes the given fields. `require_exists` makes the write fail when
  /// the document is absent instead of creating it.
  async fn patch_document(
    &self,
    collection: &str,
    id: &str,
    fields: &DocumentFields,
    require_exists: bool,
  ) -> Result<(), AppError> {
    let url = self.document_url(collection, id);
    let mut query: Vec<(&str, String)> = fields
      .keys()
      .map(|k| ("updateMask.fieldPaths", k.clone()))
      .collect();
    if require_exists {
      query.push(("currentDocument.exists", "true".to_string()));
    }

    let body = json!({ "fields": to_fields(fields) });
    let response = self
      .authorize(self.http.patch(&url))
      .query(&query)
      .json(&body)
      .send()
      .await
      .map_err(|e| Self::transport_error("patch document", e))?;

    if !response.status().is_success() {
      return Err(Self::status_error("patch document", response).await);
    }
    debug!(collection, id, field_count = fields.len(), "Document patched");
    Ok(())
  }

  async fn delete_document(&self, collection: &str, id: &str) -> Result<(), AppError> {
    let url = self.document_url(collection, id);
    let response = self
      .authorize(self.http.delete(&url))
      .send()
      .await
      .map_err(|e| Self::transport_error("delete document", e))?;

    // Deleting an absent document is a success on the wire as well.
    if !response.status().is_success() {
      return Err(Self::status_error("delete document", response).await);
    }
    debug!(collection, id, "Document deleted");
    Ok(())
  }

  /// Lists every document in a collection, following pagination. Each entry is
  /// the decoded field map with the document key inserted as `id`.
  async fn list_collection(&self, collection: &str) -> Result<Vec<Value>, AppError> {
    let url = format!("{}/{}", self.documents_root(), collection);
    let mut out = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
      let mut query: Vec<(&str, String)> = vec![("pageSize", PAGE_SIZE.to_string())];
      if let Some(token) = &page_token {
        query.push(("pageToken", token.clone()));
      }

      let response = self
        .authorize(self.http.get(&url))
        .query(&query)
        .send()
        .await
        .map_err(|e| Self::transport_error("list collection", e))?;
      if !response.status().is_success() {
        return Err(Self::status_error("list collection", response).await);
      }

      let page: Value = response
        .json()
        .await
        .map_err(|e| Self::transport_error("decode collection page", e))?;

      if let Some(documents) = page.get("documents").and_then(Value::as_array) {
        for doc in documents {
          let mut fields = doc
            .get("fields")
            .and_then(Value::as_object)
            .map(from_fields)
            .unwrap_or_default();
          if let Some(id) = doc
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.rsplit('/').next())
          {
            fields.insert("id".to_string(), Value::from(id));
          }
          out.push(Value::Object(fields));
        }
      }

      page_token = page
        .get("nextPageToken")
        .and_then(Value::as_str)
        .map(str::to_string);
      if page_token.is_none() {
        break;
      }
    }

    Ok(out)
  }
}

#[async_trait]
impl DocumentCatalog for FirestoreClient {
  #[instrument(name = "documents::fetch_product", skip(self))]
  async fn fetch_product(&self, id: &str) -> Result<Option<DocumentFields>, AppError> {
    self.get_document(PRODUCTS, id).await
  }

  #[instrument(name = "documents::list_products", skip(self))]
  async fn list_products(&self) -> Result<Vec<Value>, AppError> {
    self.list_collection(PRODUCTS).await
  }

  #[instrument(name = "documents::write_product", skip(self, fields))]
  async fn write_product(&self, id: &str, fields: &Map<String, Value>) -> Result<(), AppError> {
    self.patch_document(PRODUCTS, id, fields, false).await
  }

  #[instrument(name = "documents::delete_product", skip(self))]
  async fn delete_product(&self, id: &str) -> Result<(), AppError> {
    self.delete_document(PRODUCTS, id).await
  }

  #[instrument(name = "documents::list_categories", skip(self))]
  async fn list_categories(&self) -> Result<Vec<Value>, AppError> {
    self.list_collection(CATEGORIES).await
  }

  #[instrument(name = "documents::update_category", skip(self, fields))]
  async fn update_category(&self, id: &str, fields: &Map<String, Value>) -> Result<(), AppError> {
    self.patch_document(CATEGORIES, id, fields, true).await
  }

  #[instrument(name = "documents::delete_category", skip(self))]
  async fn delete_category(&self, id: &str) -> Result<(), AppError> {
    self.delete_document(CATEGORIES, id).await
  }
}
