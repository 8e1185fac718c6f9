// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the storesync CLI.

pub mod import;
pub mod plans;
pub mod types;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use storesync_core::AppConfig;

use crate::cli::{Commands, OutputContext, PlansCommand};
use crate::output;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if !ctx.is_interactive() {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Import {
            csv,
            dry_run,
            limit,
        } => {
            let result = import::run(config, csv, dry_run, limit, &ctx).await?;
            output::render(&result, &ctx)
        }
        Commands::Plans(PlansCommand::Scan { handles, name }) => {
            let result = plans::run(config, handles, name, &ctx).await?;
            output::render(&result, &ctx)
        }
    }
}
