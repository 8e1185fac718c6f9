// SPDX-License-Identifier: Apache-2.0

//! Batch input: article rows read from a CSV export.
//!
//! The header row is validated up front; rows are then decoded lazily so a
//! `--limit` never reads further than it processes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::SyncError;

/// Columns that must be present in the header row.
pub const REQUIRED_HEADERS: [&str; 8] = [
    "Handle",
    "Title",
    "Blog",
    "Author",
    "Body HTML",
    "Tags",
    "Published",
    "Template Suffix",
];

/// Raw CSV row. Every column is optional at the decoding layer; required
/// fields are enforced by the ensurer.
#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(rename = "Handle", default)]
    handle: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Blog", default)]
    blog: Option<String>,
    #[serde(rename = "Author", default)]
    author: Option<String>,
    #[serde(rename = "Body HTML", default)]
    body_html: Option<String>,
    #[serde(rename = "Tags", default)]
    tags: Option<String>,
    #[serde(rename = "Published", default)]
    published: Option<String>,
    #[serde(rename = "Template Suffix", default)]
    template_suffix: Option<String>,
}

/// One article to import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, bon::Builder)]
#[builder(on(String, into))]
pub struct InputRecord {
    /// Unique handle within the blog (trimmed).
    #[builder(default)]
    pub handle: String,
    /// Article title (trimmed).
    #[builder(default)]
    pub title: String,
    /// Blog column as exported; informational only.
    #[builder(default)]
    pub blog: String,
    /// Author name; blank means "use the default".
    #[builder(default)]
    pub author: String,
    /// Article body, kept verbatim.
    #[builder(default)]
    pub body_html: String,
    /// Tags in input order, without blanks or duplicates.
    #[builder(default)]
    pub tags: Vec<String>,
    /// Publish on creation.
    #[builder(default)]
    pub published: bool,
    /// Template suffix; blank means "use the default".
    #[builder(default)]
    pub template_suffix: String,
}

impl From<CsvRow> for InputRecord {
    fn from(row: CsvRow) -> Self {
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();
        Self {
            handle: trimmed(row.handle),
            title: trimmed(row.title),
            blog: trimmed(row.blog),
            author: trimmed(row.author),
            body_html: row.body_html.unwrap_or_default(),
            tags: parse_tags(row.tags.as_deref().unwrap_or_default()),
            published: parse_published(row.published.as_deref().unwrap_or_default()),
            template_suffix: trimmed(row.template_suffix),
        }
    }
}

/// Splits a comma-separated tag field, dropping blanks and repeats.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Only the literal `TRUE` (any case, surrounding whitespace ignored) publishes.
#[must_use]
pub fn parse_published(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("TRUE")
}

/// A CSV source whose header row has been validated.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
}

impl CsvSource<File> {
    /// Opens `path` and validates its header row.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InputFormat` if the file is missing, empty, or
    /// lacks any of [`REQUIRED_HEADERS`].
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| SyncError::InputFormat {
            message: format!("Cannot open CSV {}: {e}", path.display()),
        })?;
        Self::from_reader(file).map_err(|err| match err {
            SyncError::InputFormat { message } => SyncError::InputFormat {
                message: format!("{message} ({})", path.display()),
            },
            other => other,
        })
    }
}

impl<R: Read> CsvSource<R> {
    /// Wraps `reader` and validates its header row.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InputFormat` if the input is empty or lacks any of
    /// [`REQUIRED_HEADERS`].
    pub fn from_reader(reader: R) -> Result<Self> {
        // Short rows are padded with blanks; required fields are checked per record.
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(String::is_empty) {
            return Err(SyncError::InputFormat {
                message: "CSV appears empty".to_string(),
            });
        }

        let missing: Vec<&str> = REQUIRED_HEADERS
            .iter()
            .copied()
            .filter(|required| !headers.iter().any(|h| h == required))
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::InputFormat {
                message: format!(
                    "CSV missing required headers: {missing:?}. Found headers: {headers:?}"
                ),
            });
        }

        reader.set_headers(csv::StringRecord::from(headers));
        Ok(Self { reader })
    }

    /// Decodes rows lazily, in file order.
    ///
    /// A row that cannot be decoded yields `SyncError::InputFormat` for that
    /// row only; iteration continues with the next row.
    pub fn records(self) -> impl Iterator<Item = Result<InputRecord>> {
        self.reader
            .into_deserialize::<CsvRow>()
            .map(|row| row.map(InputRecord::from).map_err(SyncError::from))
    }
}
