// SPDX-License-Identifier: Apache-2.0

//! Common UX helpers shared by commands.

use std::io::Write;

use console::style;
use storesync_core::PlanScan;

use crate::cli::OutputContext;

/// Display a "[current/total] handle: result" line for one scanned product.
pub fn show_progress(ctx: &OutputContext, current: usize, total: usize, scan: &PlanScan) {
    if !ctx.is_text() {
        return;
    }

    let line = match scan {
        PlanScan::Found {
            handle, plan_id, ..
        } => format!("{}: plan {}", handle, style(plan_id).green()),
        PlanScan::NotFound { handle, .. } => {
            format!("{}: {}", handle, style("no matching plan").yellow())
        }
        PlanScan::Error { handle, reason } => format!("{}: {}", handle, style(reason).red()),
    };
    println!("[{current}/{total}] {line}");
}

/// Display dry-run message to a writer.
///
/// # Errors
/// Returns error if write operation fails.
pub fn show_dry_run_message<W: Write + ?Sized>(w: &mut W, message: &str) -> std::io::Result<()> {
    writeln!(w, "{}", style(message).yellow())
}
