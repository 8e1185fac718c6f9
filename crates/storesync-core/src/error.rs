// SPDX-License-Identifier: Apache-2.0

//! Error types for storesync.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field-level validation error returned inside a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserError {
    /// Path to the offending input field, if the API reported one.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

fn join_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during storesync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Batch input file is missing, empty, or lacks required columns.
    #[error("Input format error: {message}")]
    InputFormat {
        /// Error message.
        message: String,
    },

    /// A single record lacks fields required to create the resource.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// Connection-level failure or an undecodable response body.
    #[error("Network error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The API reported throttling inside an otherwise well-formed response.
    #[error("Throttled: {message}")]
    Throttled {
        /// Serialized `errors` payload.
        message: String,
    },

    /// Request-level `errors` list from the GraphQL endpoint.
    #[error("GraphQL errors: {message}")]
    GraphQl {
        /// Serialized `errors` payload, preserved verbatim.
        message: String,
    },

    /// Mutation-level `userErrors`.
    #[error("{operation} userErrors: {}", join_user_errors(.errors))]
    UserErrors {
        /// Mutation name (e.g. `articleCreate`).
        operation: String,
        /// Errors reported by the API.
        errors: Vec<UserError>,
    },

    /// Response was JSON but did not have the expected shape.
    #[error("Unexpected response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// A transient failure persisted past the retry budget.
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: usize,
        /// The error from the final attempt.
        #[source]
        last: Box<SyncError>,
    },
}

impl SyncError {
    /// Returns true for failures worth another attempt: connection errors,
    /// retryable HTTP statuses and throttling.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Transport { .. } | SyncError::Throttled { .. } => true,
            SyncError::Http { status, .. } => crate::retry::is_retryable_http(*status),
            _ => false,
        }
    }

    /// Returns true when the outcome of the request on the server is unknown,
    /// i.e. a write may have been applied even though we saw a failure.
    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            SyncError::Transport { .. } | SyncError::RetriesExhausted { .. }
        ) || matches!(self, SyncError::Http { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return SyncError::Http {
                status: status.as_u16(),
                body: String::new(),
            };
        }
        SyncError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for SyncError {
    fn from(err: csv::Error) -> Self {
        SyncError::InputFormat {
            message: err.to_string(),
        }
    }
}
