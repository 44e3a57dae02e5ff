//! Client for the external client-KYC record endpoint.
//!
//! Reports a confirmed completion: `PATCH {base}/clients/{client_id}/kyc`
//! with the aggregate check map. Unlike the verification calls, failures
//! here are returned as [`ClientError`] so the caller decides how to log
//! them.

use std::time::Duration;

use kyc_core::{ClientId, Timestamp, VerificationChecks};
use serde::Serialize;

use crate::config::{endpoint_url, ConfigError, RecordsConfig};
use crate::error::ClientError;

/// Body of the client-KYC PATCH.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientKycUpdate {
    pub kyc_verified: bool,
    pub checks: VerificationChecks,
    pub completed_at: String,
}

impl ClientKycUpdate {
    pub fn new(checks: VerificationChecks, completed_at: Timestamp) -> Self {
        Self {
            kyc_verified: checks.all_passed(),
            checks,
            completed_at: completed_at.to_canonical_string(),
        }
    }
}

/// HTTP client for the record-keeping service.
#[derive(Debug, Clone)]
pub struct RecordsClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl RecordsClient {
    /// Create a new records client from configuration.
    pub fn new(config: RecordsConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_token.as_str()
                    ))
                    .map_err(|_| ConfigError::InvalidHeader("Authorization".into()))?,
                );
                headers
            })
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Record the completion of a client's KYC.
    pub async fn patch_client_kyc(
        &self,
        client_id: &ClientId,
        update: &ClientKycUpdate,
    ) -> Result<(), ClientError> {
        let path = format!("clients/{}/kyc", client_id.as_str());
        let endpoint = format!("PATCH /{path}");
        let url = endpoint_url(&self.base_url, &path);

        let resp = self
            .http
            .patch(&url)
            .json(update)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                endpoint,
                status: status.as_u16(),
                message: None,
                body,
            });
        }

        tracing::debug!(client_id = %client_id, "client KYC record updated");
        Ok(())
    }
}
