// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `SyncError` and appends a tip for the error
//! classes a user can usually fix themselves.

use anyhow::Error;
use storesync_core::SyncError;
use storesync_core::config::{ACCESS_TOKEN_ENV, STORE_DOMAIN_ENV};

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `SyncError`, returns the original error message.
pub fn format_error(error: &Error) -> String {
    let Some(sync_err) = error.downcast_ref::<SyncError>() else {
        return error.to_string();
    };

    let tip = match sync_err {
        SyncError::Config { .. } => format!(
            "Export {STORE_DOMAIN_ENV} and {ACCESS_TOKEN_ENV}, or set them in {}",
            storesync_core::config_file_path().display()
        ),
        SyncError::InputFormat { .. } => {
            "Pass the CSV export with --csv. The header row must include every import column."
                .to_string()
        }
        SyncError::Http {
            status: 401 | 403, ..
        } => format!("Check that {ACCESS_TOKEN_ENV} is valid and has the write_content scope."),
        SyncError::RetriesExhausted { .. } | SyncError::Transport { .. } => {
            "The store could not be reached reliably. Check your connection and run again; \
             records already created will be skipped."
                .to_string()
        }
        SyncError::UserErrors { .. } => {
            "The API rejected the input. Check the blog settings in your config.".to_string()
        }
        _ => return sync_err.to_string(),
    };

    format!("{sync_err}\n\nTip: {tip}")
}
