// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Missing bearer token")]
  TokenMissing,

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Version conflict on {entity} {id}: expected version {expected}")]
  VersionConflict {
    entity: &'static str,
    id: String,
    expected: i64,
  },

  #[error("Database Error: {0}")]
  Persistence(#[from] sqlx::Error),

  #[error("Document Store Error: {0}")]
  DocumentStore(String),

  // The relational mutation is durable; only the document-store mirror failed.
  // `detail` is composed by the coordinator and is safe to return to callers.
  #[error("Partial write: {detail}")]
  PartialWrite { detail: String },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error here so the response bodies can stay generic.
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::TokenMissing => {
        HttpResponse::BadRequest().json(json!({"error": "Missing required parameters"}))
      }
      AppError::Auth(_) => HttpResponse::Forbidden().json(json!({"error": "Unauthorized access"})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::VersionConflict { entity, id, expected } => HttpResponse::Conflict().json(json!({
        "error": format!("{} {} was modified concurrently (expected version {})", entity, id, expected),
      })),
      AppError::Persistence(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"}))
      }
      AppError::DocumentStore(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Document store operation failed"}))
      }
      AppError::PartialWrite { detail } => HttpResponse::InternalServerError().json(json!({
        "error": detail,
        "primaryCommitted": true,
      })),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Internal(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred"}))
      }
    }
  }
}

// Result alias used throughout the application.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
