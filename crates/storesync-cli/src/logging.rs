// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the storesync CLI.
//!
//! Uses `tracing` with `tracing-subscriber`, writing to stderr so stdout
//! stays clean for `--output json|yaml`. `RUST_LOG` always wins over the
//! built-in default.
//!
//! ```bash
//! # Retry notices and request details
//! RUST_LOG=storesync=debug storesync import --dry-run
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "storesync=warn,reqwest=error";
const VERBOSE_FILTER: &str = "storesync=debug,reqwest=error";

/// Initialize the logging subsystem.
///
/// `verbose` raises the default filter to debug for storesync crates.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
