// SPDX-License-Identifier: Apache-2.0

//! Sequential batch driver for the article import.
//!
//! Records are processed strictly in input order, one at a time. A failing
//! record is recorded and the batch moves on; only setup (the blog) is fatal.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::Result;
use crate::record::InputRecord;
use crate::shopify::client::AdminClient;
use crate::shopify::ensurer::{ArticleDefaults, SyncOutcome, ensure_article};
use crate::shopify::resolver::ResourceRef;
use crate::shopify::transport::GraphqlTransport;

/// Label used for rows without a handle.
pub const MISSING_HANDLE_LABEL: &str = "(missing handle)";

/// Options for one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Process at most this many rows.
    pub limit: Option<usize>,
    /// Send no mutations.
    pub dry_run: bool,
    /// Fallbacks for blank optional fields.
    pub defaults: ArticleDefaults,
}

/// A failed record: its label and the error detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecord {
    /// Handle, or a placeholder such as [`MISSING_HANDLE_LABEL`].
    pub label: String,
    /// Error message, verbatim.
    pub reason: String,
}

/// Per-record progress notification.
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    /// 1-based position in the input.
    pub index: usize,
    /// Handle or placeholder label.
    pub label: String,
    /// What happened.
    pub outcome: SyncOutcome,
}

/// Run-level tallies with the literal ordered handle lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Created (or, in a dry run, would-be-created) handles.
    pub created: Vec<String>,
    /// Handles that already existed.
    pub skipped: Vec<String>,
    /// Failed records.
    pub failed: Vec<FailedRecord>,
}

impl Summary {
    /// Number of records processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created.len() + self.skipped.len() + self.failed.len()
    }

    /// Labels of failed records, in order.
    #[must_use]
    pub fn failed_labels(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.label.as_str()).collect()
    }

    fn record(&mut self, label: String, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Created { .. } => self.created.push(label),
            SyncOutcome::Skipped => self.skipped.push(label),
            SyncOutcome::Failed { reason } => self.failed.push(FailedRecord {
                label,
                reason: reason.clone(),
            }),
        }
    }
}

/// Imports `rows` into `blog`.
///
/// `blog` is `None` only for a dry run against a blog that does not exist yet.
/// At most `options.limit` rows are pulled from the iterator. `on_report` is
/// called after each record, in input order.
#[instrument(skip_all, fields(dry_run = options.dry_run, limit = ?options.limit))]
pub async fn run_import<T, I, F>(
    client: &AdminClient<T>,
    blog: Option<&ResourceRef>,
    rows: I,
    options: &ImportOptions,
    mut on_report: F,
) -> Summary
where
    T: GraphqlTransport,
    I: IntoIterator<Item = Result<InputRecord>>,
    F: FnMut(&RecordReport),
{
    let mut summary = Summary {
        dry_run: options.dry_run,
        ..Summary::default()
    };

    let rows = rows.into_iter().take(options.limit.unwrap_or(usize::MAX));
    for (idx, row) in rows.enumerate() {
        let index = idx + 1;
        let (label, outcome) = match row {
            Err(err) => (
                format!("(row {index})"),
                SyncOutcome::Failed {
                    reason: err.to_string(),
                },
            ),
            Ok(record) if record.handle.trim().is_empty() => (
                MISSING_HANDLE_LABEL.to_string(),
                SyncOutcome::Failed {
                    reason: "Missing handle".to_string(),
                },
            ),
            Ok(record) => {
                let outcome = ensure_article(
                    client,
                    blog,
                    &record,
                    &options.defaults,
                    options.dry_run,
                )
                .await
                .unwrap_or_else(|err| SyncOutcome::Failed {
                    reason: err.to_string(),
                });
                (record.handle, outcome)
            }
        };

        debug!(index, label = %label, outcome = ?outcome, "Record processed");
        on_report(&RecordReport {
            index,
            label: label.clone(),
            outcome: outcome.clone(),
        });
        summary.record(label, &outcome);
    }

    summary
}
