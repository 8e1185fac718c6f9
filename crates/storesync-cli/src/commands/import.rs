// SPDX-License-Identifier: Apache-2.0

//! Article import command.

use std::path::PathBuf;

use anyhow::Result;
use storesync_core::AppConfig;
use storesync_core::record::CsvSource;
use storesync_core::shopify::{self, ensurer::ensure_blog};
use storesync_core::sync::{ImportOptions, run_import};
use tracing::{debug, info};

use super::maybe_spinner;
use super::types::{BlogReport, ImportResult};
use crate::cli::OutputContext;
use crate::output::import::{show_blog, show_record};

/// Ensures the configured blog, then imports every CSV row into it.
///
/// Credentials and the CSV header are both checked before the first request.
/// Per-record failures end up in the summary; only setup errors are returned.
pub async fn run(
    config: &AppConfig,
    csv: Option<PathBuf>,
    dry_run: bool,
    limit: Option<usize>,
    ctx: &OutputContext,
) -> Result<ImportResult> {
    let client = shopify::connect(config)?;

    let path = csv.unwrap_or_else(|| config.import.csv_path.clone());
    debug!(path = %path.display(), "Opening CSV");
    let source = CsvSource::open(&path)?;

    let spinner = maybe_spinner(ctx, "Resolving blog...");
    let state = ensure_blog(&client, &config.blog.spec(), dry_run).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let state = state?;

    let blog = BlogReport::from(&state);
    info!(handle = %blog.handle, status = blog.status, "Blog ready");
    show_blog(ctx, &blog);

    let options = ImportOptions {
        limit,
        dry_run,
        defaults: config.blog.article_defaults(),
    };
    let summary = run_import(
        &client,
        state.resource(),
        source.records(),
        &options,
        |report| show_record(ctx, report),
    )
    .await;

    Ok(ImportResult { blog, summary })
}
