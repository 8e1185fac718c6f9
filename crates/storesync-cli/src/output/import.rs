// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};

use console::style;
use storesync_core::{RecordReport, SyncOutcome};

use super::Renderable;
use super::common::show_dry_run_message;
use crate::cli::OutputContext;
use crate::commands::types::{BlogReport, ImportResult};

/// Display which blog the run targets.
pub fn show_blog(ctx: &OutputContext, blog: &BlogReport) {
    if !ctx.is_text() {
        return;
    }

    let status = match blog.status {
        "created" => style("created").green(),
        "planned" => style("would be created").yellow(),
        other => style(other).dim(),
    };
    match (&blog.id, ctx.verbose) {
        (Some(id), true) => println!("Blog {} ({status}, {id})", style(&blog.handle).bold()),
        _ => println!("Blog {} ({status})", style(&blog.handle).bold()),
    }
}

/// Display one progress line per record, in input order.
pub fn show_record(ctx: &OutputContext, report: &RecordReport) {
    if !ctx.is_text() {
        return;
    }

    let tag = match &report.outcome {
        SyncOutcome::Created { preview: true } => style("DRY RUN").yellow(),
        SyncOutcome::Created { preview: false } => style("CREATED").green(),
        SyncOutcome::Skipped => style("SKIP").dim(),
        SyncOutcome::Failed { .. } => style("FAILED").red(),
    };
    match &report.outcome {
        SyncOutcome::Failed { reason } => println!("{tag}: {} - {reason}", report.label),
        _ => println!("{tag}: {}", report.label),
    }
}

fn write_handles(w: &mut dyn Write, label: &str, handles: &[String]) -> io::Result<()> {
    if handles.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}", style(format!("{label}:")).bold())?;
    for handle in handles {
        writeln!(w, "  {handle}")?;
    }
    Ok(())
}

impl Renderable for ImportResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        let summary = &self.summary;
        let created_label = if summary.dry_run {
            "Would create"
        } else {
            "Created"
        };

        writeln!(w)?;
        writeln!(w, "{}", style("Import Summary").bold().green())?;
        writeln!(w, "{}", style("=".repeat(14)).dim())?;
        writeln!(
            w,
            "  {created_label}: {}",
            style(summary.created.len()).green()
        )?;
        writeln!(w, "  Skipped: {}", style(summary.skipped.len()).yellow())?;
        writeln!(w, "  Failed:  {}", style(summary.failed.len()).red())?;
        writeln!(w, "  Total:   {}", summary.total())?;

        write_handles(w, created_label, &summary.created)?;
        write_handles(w, "Skipped", &summary.skipped)?;

        if !summary.failed.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", style("Failures").bold().red())?;
            for failed in &summary.failed {
                writeln!(w, "  {}: {}", failed.label, failed.reason)?;
            }
        }

        if summary.dry_run {
            writeln!(w)?;
            show_dry_run_message(w, "Dry run - no changes were made.")?;
        }
        writeln!(w)?;
        Ok(())
    }
}
