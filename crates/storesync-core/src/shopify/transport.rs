// SPDX-License-Identifier: Apache-2.0

//! Single-attempt transport for the Admin GraphQL endpoint.
//!
//! A transport performs exactly one POST and classifies the outcome; retry
//! policy lives in [`super::client::AdminClient`]. Tests substitute their own
//! implementation of [`GraphqlTransport`].

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use crate::config::StoreSettings;
use crate::error::SyncError;

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// One round trip to a GraphQL endpoint.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Posts `body` (`{"query": ..., "variables": ...}`) and returns the
    /// decoded JSON response.
    ///
    /// Implementations map connection failures and undecodable bodies to
    /// `SyncError::Transport`, and non-success statuses to `SyncError::Http`.
    async fn post(&self, body: &Value) -> Result<Value, SyncError>;
}

/// `reqwest`-backed transport for the Shopify Admin API.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    access_token: SecretString,
}

impl HttpTransport {
    /// Creates a transport for `endpoint` authenticating with `access_token`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Transport` if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        access_token: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            access_token,
        })
    }

    /// Creates a transport for the store's Admin GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Transport` if the HTTP client cannot be built.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, SyncError> {
        Self::new(
            settings.graphql_endpoint(),
            settings.access_token.clone(),
            settings.timeout,
        )
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn post(&self, body: &Value) -> Result<Value, SyncError> {
        debug!(endpoint = %self.endpoint, "POST GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, self.access_token.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| SyncError::Transport {
            message: format!("Failed to decode response body: {e}"),
        })
    }
}
