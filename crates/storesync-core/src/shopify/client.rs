// SPDX-License-Identifier: Apache-2.0

//! Admin API client with retry and backoff.

use std::sync::atomic::{AtomicUsize, Ordering};

use backon::Retryable;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::transport::GraphqlTransport;
use crate::Result;
use crate::error::SyncError;
use crate::retry::{RetryPolicy, is_throttle_message};

/// Executes GraphQL documents against the Admin API.
///
/// Every call runs its own backoff loop; nothing is shared between calls.
pub struct AdminClient<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: GraphqlTransport> AdminClient<T> {
    /// Creates a client over `transport` using `policy` for every call.
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes `document` with `variables` and returns the response `data`.
    ///
    /// Connection failures, HTTP 429/5xx and throttling errors are retried
    /// with exponential backoff. Other failures return immediately.
    ///
    /// # Errors
    ///
    /// - `SyncError::RetriesExhausted` when transient failures outlast the policy
    /// - `SyncError::GraphQl` / `SyncError::Http` for non-retryable failures
    /// - `SyncError::MalformedResponse` when `data` is missing
    pub async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        let body = json!({ "query": document, "variables": variables });
        let attempts = AtomicUsize::new(0);

        let body = &body;
        let counter = &attempts;
        let result = (|| async move {
            counter.fetch_add(1, Ordering::Relaxed);
            self.attempt(body).await
        })
        .retry(self.policy.backoff())
        .when(SyncError::is_transient)
        .notify(|err, dur| {
            warn!(error = %err, delay = ?dur, "Retrying after transient failure");
        })
        .await;

        let attempts = attempts.load(Ordering::Relaxed);
        match result {
            Ok(data) => {
                debug!(attempts, "GraphQL request succeeded");
                Ok(data)
            }
            Err(err) if err.is_transient() => Err(SyncError::RetriesExhausted {
                attempts,
                last: Box::new(err),
            }),
            Err(err) => Err(err),
        }
    }

    /// Executes `document` and deserializes the value at `pointer` inside `data`.
    ///
    /// # Errors
    ///
    /// Everything [`Self::execute`] returns, plus `SyncError::MalformedResponse`
    /// if the value is absent or has the wrong shape.
    pub async fn query_at<R: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
        pointer: &str,
    ) -> Result<R> {
        let data = self.execute(document, variables).await?;
        extract(&data, pointer)
    }

    async fn attempt(&self, body: &Value) -> Result<Value> {
        let mut response = self.transport.post(body).await?;

        if let Some(errors) = response.get("errors")
            && has_entries(errors)
        {
            let message = serde_json::to_string(errors).unwrap_or_default();
            if is_throttle_message(&message) {
                return Err(SyncError::Throttled { message });
            }
            return Err(SyncError::GraphQl { message });
        }

        match response.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(SyncError::MalformedResponse {
                message: "missing 'data' field in GraphQL response".to_string(),
            }),
        }
    }
}

fn has_entries(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Deserializes the value at a JSON pointer.
pub(crate) fn extract<R: DeserializeOwned>(data: &Value, pointer: &str) -> Result<R> {
    let value = data
        .pointer(pointer)
        .ok_or_else(|| SyncError::MalformedResponse {
            message: format!("missing '{pointer}' in response data"),
        })?;
    serde_json::from_value(value.clone()).map_err(|e| SyncError::MalformedResponse {
        message: format!("unexpected shape at '{pointer}': {e}"),
    })
}
