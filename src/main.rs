// src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use emporium::config::AppConfig;
use emporium::services::GoogleIdentityVerifier;
use emporium::state::AppState;
use emporium::stores::firestore::FirestoreClient;
use emporium::stores::relational::PgCatalog;
use emporium::web::routes::configure_app_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting emporium backend...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the relational store.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the relational store.");
      panic!("Database connection error: {}", e);
    }
  };

  // One HTTP client shared by the document store and identity provider.
  let http = reqwest::Client::new();
  let documents = FirestoreClient::new(
    http.clone(),
    &app_config.firestore_base_url,
    &app_config.firestore_project_id,
    app_config.firestore_auth_token.clone(),
  );
  let verifier = GoogleIdentityVerifier::new(http, &app_config.identity_base_url, &app_config.identity_api_key);

  let app_state = AppState::new(
    Arc::new(PgCatalog::new(db_pool)),
    Arc::new(documents),
    Arc::new(verifier),
    app_config.clone(),
  );

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
