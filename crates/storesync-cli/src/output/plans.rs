// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};

use console::style;
use storesync_core::PlanScan;
use storesync_core::storefront::render_plan_map;

use super::Renderable;
use crate::cli::OutputContext;
use crate::commands::types::PlanScanResult;

impl Renderable for PlanScanResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w)?;
        writeln!(w, "{}", render_plan_map(&self.name, &self.scans))?;

        let missing: Vec<&str> = self
            .scans
            .iter()
            .filter_map(|scan| match scan {
                PlanScan::Found { .. } => None,
                PlanScan::NotFound { handle, .. } | PlanScan::Error { handle, .. } => {
                    Some(handle.as_str())
                }
            })
            .collect();
        if !missing.is_empty() {
            writeln!(w)?;
            writeln!(
                w,
                "{} {}",
                style("Not mapped:").yellow(),
                missing.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn test_text_prints_map_and_unmapped_handles() {
        console::set_colors_enabled(false);
        let result = PlanScanResult {
            name: "CHILD_PLAN_MAP_BIWEEKLY".to_string(),
            scans: vec![
                PlanScan::Found {
                    handle: "steak-oz-1".to_string(),
                    product_id: 7001,
                    title: "Steak (oz)".to_string(),
                    plan_id: 22,
                },
                PlanScan::Error {
                    handle: "gone".to_string(),
                    reason: "HTTP 404: ".to_string(),
                },
            ],
        };
        let ctx = OutputContext {
            format: OutputFormat::Text,
            verbose: false,
            is_tty: false,
        };

        let mut buf = Vec::new();
        result.render_text(&mut buf, &ctx).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("const CHILD_PLAN_MAP_BIWEEKLY = {"));
        assert!(text.contains("\"7001\": \"22\", // Steak (oz)"));
        assert!(text.contains("Not mapped: gone"));
    }
}
