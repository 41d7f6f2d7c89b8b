// src/services/identity.rs

//! Bearer-token verification against the identity provider. The rest of the
//! service only branches on success vs failure; the provider's rejection
//! sub-cases (malformed, expired, revoked) all surface as `AppError::Auth`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, instrument, warn};

use crate::errors::AppError;

/// Decoded identity claims for a verified caller.
#[derive(Debug, Clone)]
pub struct Claims {
  pub uid: String,
  pub email: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
  async fn verify(&self, token: &str) -> Result<Claims, AppError>;
}

/// REST verifier backed by the Identity Toolkit `accounts:lookup` endpoint.
#[derive(Clone)]
pub struct GoogleIdentityVerifier {
  http: reqwest::Client,
  base_url: String,
  api_key: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
  #[serde(default)]
  users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
  local_id: String,
  #[serde(default)]
  email: Option<String>,
}

impl GoogleIdentityVerifier {
  pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
    Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
      api_key: api_key.to_string(),
    }
  }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
  #[instrument(name = "identity::verify", skip(self, token))]
  async fn verify(&self, token: &str) -> Result<Claims, AppError> {
    let url = format!("{}/accounts:lookup", self.base_url);
    let response = self
      .http
      .post(&url)
      .query(&[("key", self.api_key.as_str())])
      .json(&json!({ "idToken": token }))
      .send()
      .await
      .map_err(|e| {
        // A provider outage is not the caller's fault.
        error!(error = %e, "Identity provider unreachable");
        AppError::Internal(format!("identity provider unreachable: {}", e))
      })?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      warn!(%status, %body, "Identity provider rejected token");
      return Err(AppError::Auth("token rejected by identity provider".to_string()));
    }

    let lookup: LookupResponse = response.json().await.map_err(|e| {
      error!(error = %e, "Identity provider response was not decodable");
      AppError::Internal(format!("identity provider response: {}", e))
    })?;

    match lookup.users.into_iter().next() {
      Some(user) => {
        debug!(uid = %user.local_id, "Token verified");
        Ok(Claims {
          uid: user.local_id,
          email: user.email,
        })
      }
      None => {
        warn!("Identity provider returned no account for token");
        Err(AppError::Auth("token does not resolve to an account".to_string()))
      }
    }
  }
}
