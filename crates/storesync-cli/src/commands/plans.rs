// SPDX-License-Identifier: Apache-2.0

//! Selling-plan scan command.

use std::time::Duration;

use anyhow::{Result, bail};
use storesync_core::AppConfig;
use storesync_core::retry::RetryPolicy;
use storesync_core::storefront::{StorefrontClient, scan_selling_plans};

use super::types::PlanScanResult;
use crate::cli::OutputContext;
use crate::output::common::show_progress;

/// Scans `handles` (or the configured list) for a matching selling plan.
pub async fn run(
    config: &AppConfig,
    handles: Vec<String>,
    name: String,
    ctx: &OutputContext,
) -> Result<PlanScanResult> {
    let handles = if handles.is_empty() {
        config.plans.handles.clone()
    } else {
        handles
    };
    if handles.is_empty() {
        bail!("No product handles given. Pass them as arguments or set plans.handles in config.");
    }

    let base = config.store.storefront_base()?;
    let client = StorefrontClient::new(
        base,
        Duration::from_secs(config.store.timeout_seconds),
        RetryPolicy::from(&config.retry),
    )?;

    let total = handles.len();
    let mut current = 0;
    let scans = scan_selling_plans(
        &client,
        &handles,
        &config.plans.keywords,
        config.plans.pause(),
        |scan| {
            current += 1;
            show_progress(ctx, current, total, scan);
        },
    )
    .await;

    Ok(PlanScanResult { name, scans })
}
