// SPDX-License-Identifier: Apache-2.0

//! Shopify Admin API integration.
//!
//! Provides the GraphQL transport and client, existence lookups, and the
//! check-then-create logic for blogs and articles.

pub mod client;
pub mod documents;
pub mod ensurer;
pub mod resolver;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use crate::config::{AppConfig, StoreSettings};
use crate::retry::RetryPolicy;

pub use client::AdminClient;
pub use transport::{GraphqlTransport, HttpTransport};

/// Builds an Admin API client over HTTP from loaded configuration.
///
/// # Errors
///
/// Returns `SyncError::Config` if store settings are incomplete, or
/// `SyncError::Transport` if the HTTP client cannot be built.
pub fn connect(config: &AppConfig) -> crate::Result<AdminClient<HttpTransport>> {
    let settings = StoreSettings::from_config(&config.store)?;
    let transport = HttpTransport::from_settings(&settings)?;
    Ok(AdminClient::new(transport, RetryPolicy::from(&config.retry)))
}
