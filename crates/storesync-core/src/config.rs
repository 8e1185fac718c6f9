// SPDX-License-Identifier: Apache-2.0

//! Configuration management for storesync.
//!
//! Provides layered configuration from files and environment variables.
//! This is the only module that reads the process environment; everything
//! downstream receives already-loaded settings.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. `SHOPIFY_STORE_DOMAIN`, `SHOPIFY_ADMIN_ACCESS_TOKEN`, `SHOPIFY_API_VERSION`
//! 2. Environment variables (prefix: `STORESYNC_`, `__` for nesting)
//! 3. Config file: `~/.config/storesync/config.toml`
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! export SHOPIFY_STORE_DOMAIN="icon-meals-dev.myshopify.com"
//! export SHOPIFY_ADMIN_ACCESS_TOKEN="shpat_..."
//! STORESYNC_RETRY__MAX_ATTEMPTS=3 storesync import --dry-run
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::SyncError;
use crate::shopify::ensurer::{ArticleDefaults, BlogSpec};

/// Environment variable holding the `*.myshopify.com` domain.
pub const STORE_DOMAIN_ENV: &str = "SHOPIFY_STORE_DOMAIN";
/// Environment variable holding the Admin API access token.
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ADMIN_ACCESS_TOKEN";
/// Environment variable holding the Admin API version.
pub const API_VERSION_ENV: &str = "SHOPIFY_API_VERSION";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Store connection settings.
    pub store: StoreConfig,
    /// Backoff settings for remote calls.
    pub retry: RetryConfig,
    /// Target blog for the article import.
    pub blog: BlogConfig,
    /// Article import settings.
    pub import: ImportConfig,
    /// Selling-plan scan settings.
    pub plans: PlansConfig,
}

/// Store connection settings, as loaded (unvalidated).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store domain, e.g. `example.myshopify.com`.
    pub domain: Option<String>,
    /// Admin API access token.
    pub access_token: Option<String>,
    /// Admin API version.
    pub api_version: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl StoreConfig {
    /// Public storefront base URL. Only the domain is required.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the domain is missing.
    pub fn storefront_base(&self) -> Result<String, SyncError> {
        let domain = required(self.domain.as_deref(), STORE_DOMAIN_ENV)?;
        Ok(format!("https://{}", normalize_domain(&domain)))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            domain: None,
            access_token: None,
            api_version: "2025-10".to_string(),
            timeout_seconds: 45,
        }
    }
}

/// Backoff settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    pub max_attempts: usize,
    /// First retry delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
    /// Randomize delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay_ms: 1_000,
            max_delay_ms: 20_000,
            jitter: false,
        }
    }
}

/// Target blog settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Blog title used when the blog is created.
    pub title: String,
    /// Blog handle used for lookup and creation.
    pub handle: String,
    /// Template suffix for the blog, and the article fallback.
    pub template_suffix: String,
    /// Author name used when a row leaves Author blank.
    pub default_author: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "AI Knowledge Base".to_string(),
            handle: "ai-optimized".to_string(),
            template_suffix: "ai-optimized".to_string(),
            default_author: "ICON Meals".to_string(),
        }
    }
}

impl BlogConfig {
    /// Blog to look up or create.
    #[must_use]
    pub fn spec(&self) -> BlogSpec {
        BlogSpec {
            title: self.title.clone(),
            handle: self.handle.clone(),
            template_suffix: self.template_suffix.clone(),
        }
    }

    /// Fallbacks applied to blank article fields.
    #[must_use]
    pub fn article_defaults(&self) -> ArticleDefaults {
        ArticleDefaults {
            author: self.default_author.clone(),
            template_suffix: self.template_suffix.clone(),
        }
    }
}

/// Article import settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// CSV file read when `--csv` is not given.
    pub csv_path: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("./icon_ai_import.csv"),
        }
    }
}

/// Selling-plan scan settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlansConfig {
    /// Product handles scanned when none are passed on the command line.
    pub handles: Vec<String>,
    /// Plan-name fragments that identify the wanted cadence.
    pub keywords: Vec<String>,
    /// Pause between products in milliseconds.
    pub pause_ms: u64,
}

impl Default for PlansConfig {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
            keywords: vec!["2 weeks".to_string(), "bi-weekly".to_string()],
            pause_ms: 100,
        }
    }
}

impl PlansConfig {
    /// Pause between products.
    #[must_use]
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

/// Validated connection settings for the Admin API.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Store domain without scheme.
    pub domain: String,
    /// Admin API version.
    pub api_version: String,
    /// Admin API access token.
    pub access_token: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl StoreSettings {
    /// Validates the loaded store section.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the domain or access token is missing.
    pub fn from_config(store: &StoreConfig) -> Result<Self, SyncError> {
        let domain = required(store.domain.as_deref(), STORE_DOMAIN_ENV)?;
        let token = required(store.access_token.as_deref(), ACCESS_TOKEN_ENV)?;
        let api_version = store.api_version.trim();
        if api_version.is_empty() {
            return Err(SyncError::Config {
                message: "store.api_version must not be empty".to_string(),
            });
        }

        Ok(Self {
            domain: normalize_domain(&domain),
            api_version: api_version.to_string(),
            access_token: SecretString::from(token),
            timeout: Duration::from_secs(store.timeout_seconds),
        })
    }

    /// Admin GraphQL endpoint for this store.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.domain, self.api_version
        )
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    domain.trim_end_matches('/').to_string()
}

fn required(value: Option<&str>, env_name: &str) -> Result<String, SyncError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SyncError::Config {
            message: format!("Missing required environment variable: {env_name}"),
        }),
    }
}

/// Returns the storesync configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/storesync`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("storesync");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("storesync")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration from the config file and process environment.
///
/// # Errors
///
/// Returns `SyncError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, SyncError> {
    load_config_with(
        Some(config_file_path()),
        Environment::with_prefix("STORESYNC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
        |name| std::env::var(name).ok(),
    )
}

/// Load configuration from explicit sources.
///
/// `lookup` resolves the well-known `SHOPIFY_*` variables; blank values are
/// treated as unset.
///
/// # Errors
///
/// Returns `SyncError::Config` if a source cannot be read or deserialized.
pub fn load_config_with<F>(
    file: Option<PathBuf>,
    environment: Environment,
    lookup: F,
) -> Result<AppConfig, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let mut builder = Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).required(false));
    }
    let config = builder
        .add_source(environment)
        .set_override_option("store.domain", lookup(STORE_DOMAIN_ENV))?
        .set_override_option("store.access_token", lookup(ACCESS_TOKEN_ENV))?
        .set_override_option("store.api_version", lookup(API_VERSION_ENV))?
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    fn empty_env() -> Environment {
        Environment::with_prefix("STORESYNC")
            .prefix_separator("_")
            .separator("__")
            .source(Some(HashMap::new()))
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_config_with(None, empty_env(), vars(&[])).expect("defaults");

        assert_eq!(config.store.api_version, "2025-10");
        assert_eq!(config.store.timeout_seconds, 45);
        assert_eq!(config.retry.max_attempts, 6);
        assert_eq!(config.retry.max_delay_ms, 20_000);
        assert_eq!(config.blog.handle, "ai-optimized");
        assert_eq!(config.blog.default_author, "ICON Meals");
        assert_eq!(config.plans.keywords, vec!["2 weeks", "bi-weekly"]);
        assert!(config.store.domain.is_none());
    }

    #[test]
    fn test_shopify_variables_override() {
        let config = load_config_with(
            None,
            empty_env(),
            vars(&[
                (STORE_DOMAIN_ENV, "example.myshopify.com"),
                (ACCESS_TOKEN_ENV, "shpat_test"),
                (API_VERSION_ENV, "2024-07"),
            ]),
        )
        .expect("config");

        let settings = StoreSettings::from_config(&config.store).expect("valid settings");
        assert_eq!(settings.domain, "example.myshopify.com");
        assert_eq!(settings.access_token.expose_secret(), "shpat_test");
        assert_eq!(
            settings.graphql_endpoint(),
            "https://example.myshopify.com/admin/api/2024-07/graphql.json"
        );
    }

    #[test]
    fn test_blank_api_version_falls_back_to_default() {
        let config = load_config_with(None, empty_env(), vars(&[(API_VERSION_ENV, "  ")]))
            .expect("config");
        assert_eq!(config.store.api_version, "2025-10");
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let config = load_config_with(
            None,
            empty_env(),
            vars(&[(STORE_DOMAIN_ENV, "example.myshopify.com")]),
        )
        .expect("config");

        let err = StoreSettings::from_config(&config.store).unwrap_err();
        assert!(matches!(err, SyncError::Config { .. }));
        assert!(err.to_string().contains(ACCESS_TOKEN_ENV));
    }

    #[test]
    fn test_missing_domain_is_config_error() {
        let err = StoreSettings::from_config(&StoreConfig::default()).unwrap_err();
        assert!(err.to_string().contains(STORE_DOMAIN_ENV));
    }

    #[test]
    fn test_prefixed_environment_nesting() {
        let env = Environment::with_prefix("STORESYNC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(HashMap::from([
                ("STORESYNC_RETRY__MAX_ATTEMPTS".to_string(), "3".to_string()),
                ("STORESYNC_BLOG__HANDLE".to_string(), "news".to_string()),
            ])));

        let config = load_config_with(None, env, vars(&[])).expect("config");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.blog.handle, "news");
    }

    #[test]
    fn test_config_file_is_read() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(
            file,
            "[store]\ndomain = \"file.myshopify.com\"\n\n[plans]\nhandles = [\"steak-oz-1\", \"cod-oz-1\"]"
        )
        .expect("write");

        let config = load_config_with(Some(file.path().to_path_buf()), empty_env(), vars(&[]))
            .expect("config");
        assert_eq!(config.store.domain.as_deref(), Some("file.myshopify.com"));
        assert_eq!(config.plans.handles, vec!["steak-oz-1", "cod-oz-1"]);
    }

    #[test]
    fn test_domain_scheme_is_stripped() {
        for domain in [
            "https://example.myshopify.com/",
            "http://example.myshopify.com",
            "example.myshopify.com",
        ] {
            let store = StoreConfig {
                domain: Some(domain.to_string()),
                access_token: Some("token".to_string()),
                ..StoreConfig::default()
            };
            let settings = StoreSettings::from_config(&store).expect("valid");
            assert_eq!(settings.domain, "example.myshopify.com");
            assert_eq!(
                store.storefront_base().expect("domain set"),
                "https://example.myshopify.com"
            );
        }
    }

    #[test]
    fn test_storefront_base_needs_only_domain() {
        let store = StoreConfig {
            domain: Some("icon-meals-dev.myshopify.com".to_string()),
            ..StoreConfig::default()
        };
        assert_eq!(
            store.storefront_base().expect("domain set"),
            "https://icon-meals-dev.myshopify.com"
        );
        assert!(StoreConfig::default().storefront_base().is_err());
    }

    #[test]
    fn test_config_dir_ends_with_app_name() {
        assert!(config_dir().ends_with("storesync"));
    }
}
