//! Catalog gateway: how a finalized located product reaches the catalog.
//!
//! Located submissions go through the HTTP endpoint so they pass the same
//! duplicate-detection gate as any other API caller. The trait seam lets
//! machine tests substitute a canned outcome.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BotError;

/// Result of forwarding a located product to the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Stored; the catalog assigned this id.
    Created { id: String },
    /// Rejected by the duplicate-detection gate (HTTP 409).
    Duplicate,
}

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn add_product(&self, payload: &Value) -> Result<ForwardOutcome, BotError>;
}

/// Production gateway: `POST {endpoint}` with a bounded timeout. A timeout
/// or any status other than 200/409 is an upstream failure, reported to the
/// conversation and never retried.
pub struct HttpCatalogGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpCatalogGateway {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, BotError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    async fn add_product(&self, payload: &Value) -> Result<ForwardOutcome, BotError> {
        let response = self.http.post(&self.endpoint).json(payload).send().await?;

        match response.status().as_u16() {
            200 => {
                let body: Value = response.json().await?;
                let id = body["id"].as_str().unwrap_or_default().to_string();
                Ok(ForwardOutcome::Created { id })
            }
            409 => Ok(ForwardOutcome::Duplicate),
            status => Err(BotError::Upstream(format!(
                "catalog endpoint answered {status}"
            ))),
        }
    }
}
