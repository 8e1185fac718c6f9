// SPDX-License-Identifier: Apache-2.0

//! storesync - idempotent content sync for a Shopify store.
//!
//! Imports blog articles from a CSV export and scans storefront products
//! for subscription selling plans.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use storesync_core::config;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let output_ctx = OutputContext::from_cli(cli.output, cli.verbose);

    let config = config::load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");

    match commands::run(cli.command, output_ctx, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let formatted = errors::format_error(&e);
            eprintln!("Error: {formatted}");
            Err(e)
        }
    }
}
