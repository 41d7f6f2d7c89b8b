// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Document store (Firestore-compatible REST endpoint).
  pub firestore_project_id: String,
  pub firestore_base_url: String,
  pub firestore_auth_token: Option<String>,

  // Identity provider (Identity Toolkit REST endpoint).
  pub identity_base_url: String,
  pub identity_api_key: String,

  // Whether the catalog write surface (product/category mutations, reconcile
  // excluded) demands the same bearer verification as the read surface. Off by
  // default: the observed deployment runs the admin API on an internal network.
  pub catalog_write_auth: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let firestore_project_id = get_env("FIRESTORE_PROJECT_ID")?;
    let firestore_base_url =
      get_env("FIRESTORE_BASE_URL").unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string());
    let firestore_auth_token = env::var("FIRESTORE_AUTH_TOKEN").ok().filter(|t| !t.is_empty());

    let identity_base_url =
      get_env("IDENTITY_BASE_URL").unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string());
    let identity_api_key = get_env("IDENTITY_API_KEY")?;

    let catalog_write_auth = get_env("CATALOG_WRITE_AUTH")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid CATALOG_WRITE_AUTH value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      firestore_project_id,
      firestore_base_url,
      firestore_auth_token,
      identity_base_url,
      identity_api_key,
      catalog_write_auth,
    })
  }
}
