// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # storesync core
//!
//! Core library for storesync: small, sequential synchronization jobs
//! against a Shopify store.
//!
//! This crate provides:
//! - Admin GraphQL transport with retry and exponential backoff
//! - Blog and article lookups (resolver) and check-then-create (ensurer)
//! - CSV article input and the sequential batch driver
//! - Selling-plan scanning over storefront product JSON
//! - Layered configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use storesync_core::record::CsvSource;
//! use storesync_core::shopify::{self, ensurer::ensure_blog};
//! use storesync_core::sync::{ImportOptions, run_import};
//!
//! # async fn example() -> storesync_core::Result<()> {
//! let config = storesync_core::load_config()?;
//! let client = shopify::connect(&config)?;
//!
//! let source = CsvSource::open(Path::new("articles.csv"))?;
//! let blog = ensure_blog(&client, &config.blog.spec(), false).await?;
//!
//! let options = ImportOptions {
//!     limit: Some(2),
//!     dry_run: false,
//!     defaults: config.blog.article_defaults(),
//! };
//! let summary = run_import(&client, blog.resource(), source.records(), &options, |_| {}).await;
//! println!("created: {:?}", summary.created);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{SyncError, UserError};

/// Convenience Result type for storesync operations.
///
/// This is equivalent to `std::result::Result<T, SyncError>`.
pub type Result<T> = std::result::Result<T, SyncError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{AppConfig, StoreSettings, config_dir, config_file_path, load_config};

// ============================================================================
// Retry Logic
// ============================================================================

pub use retry::{RetryPolicy, is_retryable_http};

// ============================================================================
// Synchronization
// ============================================================================

pub use record::{CsvSource, InputRecord};
pub use shopify::ensurer::{BlogState, SyncOutcome};
pub use shopify::resolver::ResourceRef;
pub use sync::{FailedRecord, ImportOptions, RecordReport, Summary};

// ============================================================================
// Selling Plans
// ============================================================================

pub use storefront::{PlanScan, StorefrontClient};

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod record;
pub mod retry;
pub mod shopify;
pub mod storefront;
pub mod sync;
