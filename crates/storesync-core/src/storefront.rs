// SPDX-License-Identifier: Apache-2.0

//! Selling-plan scanning over the public storefront product JSON.
//!
//! Each product handle is fetched from `/products/<handle>.js`; the first
//! selling plan whose name contains one of the cadence keywords wins.

use std::fmt::Write;
use std::time::Duration;

use backon::Retryable;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::error::SyncError;
use crate::retry::RetryPolicy;

/// Storefront product, reduced to the fields the scan needs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Product {
    /// Numeric product id.
    pub id: u64,
    /// Product title.
    pub title: String,
    /// Subscription plan groups.
    #[serde(default)]
    pub selling_plan_groups: Vec<SellingPlanGroup>,
}

/// Group of selling plans attached to a product.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SellingPlanGroup {
    /// Group name.
    #[serde(default)]
    pub name: String,
    /// Plans in the group.
    #[serde(default)]
    pub selling_plans: Vec<SellingPlan>,
}

/// A subscription cadence.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SellingPlan {
    /// Numeric plan id.
    pub id: u64,
    /// Display name, e.g. "Delivery every 2 Weeks".
    pub name: String,
}

/// Result of scanning one handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanScan {
    /// A matching plan was found.
    Found {
        /// Handle that was scanned.
        handle: String,
        /// Product id.
        product_id: u64,
        /// Product title.
        title: String,
        /// Matching selling plan id.
        plan_id: u64,
    },
    /// The product has no matching plan.
    NotFound {
        /// Handle that was scanned.
        handle: String,
        /// Product title.
        title: String,
    },
    /// The product could not be fetched or decoded.
    Error {
        /// Handle that was scanned.
        handle: String,
        /// Error detail.
        reason: String,
    },
}

/// Returns the first plan, across groups, whose name contains any keyword
/// (case-insensitive).
#[must_use]
pub fn find_plan<'a>(product: &'a Product, keywords: &[String]) -> Option<&'a SellingPlan> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    product
        .selling_plan_groups
        .iter()
        .flat_map(|group| &group.selling_plans)
        .find(|plan| {
            let name = plan.name.to_lowercase();
            keywords.iter().any(|k| name.contains(k.as_str()))
        })
}

/// Client for the public storefront product endpoint.
pub struct StorefrontClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl StorefrontClient {
    /// Creates a client for the storefront at `base_url` (e.g. `https://shop.example`).
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Transport` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        })
    }

    /// Fetches `/products/<handle>.js`, retrying transient failures.
    ///
    /// # Errors
    ///
    /// `SyncError::Http` for non-retryable statuses (e.g. 404 for an unknown
    /// handle), `SyncError::RetriesExhausted` when transient failures persist.
    #[instrument(skip(self))]
    pub async fn fetch_product(&self, handle: &str) -> Result<Product> {
        let url = format!("{}/products/{handle}.js", self.base_url);

        let result = (|| async { self.get_product(&url).await })
            .retry(self.policy.backoff())
            .when(SyncError::is_transient)
            .notify(|err, dur| {
                warn!(error = %err, delay = ?dur, "Retrying product fetch");
            })
            .await;

        result.map_err(|err| {
            if err.is_transient() {
                SyncError::RetriesExhausted {
                    attempts: self.policy.max_attempts,
                    last: Box::new(err),
                }
            } else {
                err
            }
        })
    }

    async fn get_product(&self, url: &str) -> Result<Product> {
        debug!(url, "GET product");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Product>().await.map_err(|e| SyncError::Transport {
            message: format!("Failed to decode product JSON: {e}"),
        })
    }
}

/// Scans `handles` in order, pausing `pause` between products.
///
/// A handle that fails is reported as [`PlanScan::Error`]; the scan goes on.
pub async fn scan_selling_plans<F>(
    client: &StorefrontClient,
    handles: &[String],
    keywords: &[String],
    pause: Duration,
    mut on_scan: F,
) -> Vec<PlanScan>
where
    F: FnMut(&PlanScan),
{
    let mut scans = Vec::with_capacity(handles.len());

    for (idx, handle) in handles.iter().enumerate() {
        if idx > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let scan = match client.fetch_product(handle).await {
            Ok(product) => match find_plan(&product, keywords) {
                Some(plan) => PlanScan::Found {
                    handle: handle.clone(),
                    product_id: product.id,
                    title: product.title.clone(),
                    plan_id: plan.id,
                },
                None => PlanScan::NotFound {
                    handle: handle.clone(),
                    title: product.title.clone(),
                },
            },
            Err(err) => PlanScan::Error {
                handle: handle.clone(),
                reason: err.to_string(),
            },
        };

        on_scan(&scan);
        scans.push(scan);
    }

    scans
}

/// Renders found plans as a JavaScript object literal keyed by product id.
#[must_use]
pub fn render_plan_map(name: &str, scans: &[PlanScan]) -> String {
    let mut out = format!("const {name} = {{\n");
    for scan in scans {
        if let PlanScan::Found {
            product_id,
            title,
            plan_id,
            ..
        } = scan
        {
            let _ = writeln!(out, "  \"{product_id}\": \"{plan_id}\", // {title}");
        }
    }
    out.push_str("};");
    out
}
