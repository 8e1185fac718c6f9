// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for storesync.
//!
//! Uses clap's derive API with noun-verb subcommands.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json, yaml)
    pub format: OutputFormat,
    /// Enable verbose output
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, colors) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && self.is_text()
    }

    /// Returns true for human-readable output.
    pub fn is_text(&self) -> bool {
        matches!(self.format, OutputFormat::Text)
    }
}

/// storesync - idempotent content sync for a Shopify store.
///
/// Store credentials come from `SHOPIFY_STORE_DOMAIN` and
/// `SHOPIFY_ADMIN_ACCESS_TOKEN`, or from ~/.config/storesync/config.toml.
#[derive(Parser)]
#[command(name = "storesync")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json, yaml)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Enable verbose output (debug-level logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import blog articles from a CSV export
    Import {
        /// CSV file to read (defaults to `import.csv_path` from config)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Look up what exists, but send no mutations
        #[arg(long)]
        dry_run: bool,

        /// Process at most N rows
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Subscription selling plans
    #[command(subcommand)]
    Plans(PlansCommand),
}

#[derive(Subcommand)]
pub enum PlansCommand {
    /// Find the bi-weekly selling plan of each product
    Scan {
        /// Product handles (defaults to `plans.handles` from config)
        handles: Vec<String>,

        /// Name of the generated JavaScript constant
        #[arg(long, default_value = "CHILD_PLAN_MAP_BIWEEKLY")]
        name: String,
    },
}
