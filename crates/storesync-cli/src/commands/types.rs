// SPDX-License-Identifier: Apache-2.0

//! Result types returned by command handlers.

use serde::Serialize;
use storesync_core::{BlogState, PlanScan, Summary};

/// How the target blog was resolved.
#[derive(Debug, Clone, Serialize)]
pub struct BlogReport {
    /// Blog handle.
    pub handle: String,
    /// Global id, absent when the blog is only planned.
    pub id: Option<String>,
    /// `existing`, `created` or `planned`.
    pub status: &'static str,
}

impl From<&BlogState> for BlogReport {
    fn from(state: &BlogState) -> Self {
        match state {
            BlogState::Existing(blog) => Self {
                handle: blog.handle.clone(),
                id: Some(blog.id.clone()),
                status: "existing",
            },
            BlogState::Created(blog) => Self {
                handle: blog.handle.clone(),
                id: Some(blog.id.clone()),
                status: "created",
            },
            BlogState::Planned(spec) => Self {
                handle: spec.handle.clone(),
                id: None,
                status: "planned",
            },
        }
    }
}

/// Result from the import command.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    /// Target blog.
    pub blog: BlogReport,
    /// Per-run tallies.
    #[serde(flatten)]
    pub summary: Summary,
}

/// Result from the plans scan command.
#[derive(Debug, Clone, Serialize)]
pub struct PlanScanResult {
    /// Name of the generated constant.
    pub name: String,
    /// One entry per handle, in input order.
    pub scans: Vec<PlanScan>,
}
