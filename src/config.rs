//! Configuration types for paginated lists and page sources
//!
//! This module contains the construction-time settings of a list and of the
//! HTTP page source, loadable from YAML or JSON files.

use crate::error::{Error, Result};
use crate::scroll::TRIGGER_DISTANCE;
use crate::types::{BackoffType, PageNumber};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from a file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagerConfig {
    /// List behaviour
    #[serde(default)]
    pub list: ListConfig,

    /// HTTP page source (required by the `fetch` command)
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

impl PagerConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.list.validate()?;
        if let Some(source) = &self.source {
            source.validate()?;
        }
        Ok(())
    }

    /// Get the source section or fail with a missing field error
    pub fn require_source(&self) -> Result<&SourceConfig> {
        self.source
            .as_ref()
            .ok_or_else(|| Error::missing_field("source"))
    }
}

// ============================================================================
// List Config
// ============================================================================

/// Construction-time settings of one paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Expected page size; informational, never checked against fetch results
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,

    /// First page to request
    #[serde(default = "default_initial_page")]
    pub initial_page: PageNumber,

    /// Total page count reported by the API, when known up front
    #[serde(default)]
    pub total_pages: Option<PageNumber>,

    /// Remaining scroll extent at which the next page is requested
    #[serde(default = "default_trigger_distance")]
    pub trigger_distance: f64,

    /// Fail a fetch that has not settled after this many milliseconds
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,

    /// Placeholder presentations
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
}

fn default_items_per_page() -> u32 {
    20
}

fn default_initial_page() -> PageNumber {
    1
}

fn default_trigger_distance() -> f64 {
    TRIGGER_DISTANCE
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            initial_page: default_initial_page(),
            total_pages: None,
            trigger_distance: default_trigger_distance(),
            fetch_timeout_ms: None,
            placeholders: PlaceholderConfig::default(),
        }
    }
}

impl ListConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size hint
    #[must_use]
    pub fn with_items_per_page(mut self, items_per_page: u32) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    /// Set the first page to request
    #[must_use]
    pub fn with_initial_page(mut self, page: PageNumber) -> Self {
        self.initial_page = page;
        self
    }

    /// Set the total page count
    #[must_use]
    pub fn with_total_pages(mut self, total_pages: PageNumber) -> Self {
        self.total_pages = Some(total_pages);
        self
    }

    /// Set the trigger distance
    #[must_use]
    pub fn with_trigger_distance(mut self, distance: f64) -> Self {
        self.trigger_distance = distance;
        self
    }

    /// Set the fetch timeout
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Set placeholder presentations
    #[must_use]
    pub fn with_placeholders(mut self, placeholders: PlaceholderConfig) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Fetch timeout as a duration
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Validate list settings
    pub fn validate(&self) -> Result<()> {
        if self.initial_page == 0 {
            return Err(Error::invalid_value("initial_page", "must be at least 1"));
        }
        if self.total_pages == Some(0) {
            return Err(Error::invalid_value("total_pages", "must be at least 1"));
        }
        if !self.trigger_distance.is_finite() || self.trigger_distance < 0.0 {
            return Err(Error::invalid_value(
                "trigger_distance",
                "must be a finite, non-negative number",
            ));
        }
        if self.fetch_timeout_ms == Some(0) {
            return Err(Error::invalid_value("fetch_timeout_ms", "must be positive"));
        }
        Ok(())
    }
}

/// Placeholder presentations for the loading, error and empty slots
///
/// Opaque to pagination: only their presence matters when choosing which
/// slot an empty list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Shown while the first page loads
    #[serde(default)]
    pub loading: Option<String>,

    /// Shown when a fetch fails
    #[serde(default)]
    pub error: Option<String>,

    /// Shown when no items exist
    #[serde(default)]
    pub empty: Option<String>,
}

impl PlaceholderConfig {
    /// Set the loading placeholder
    #[must_use]
    pub fn loading(mut self, label: impl Into<String>) -> Self {
        self.loading = Some(label.into());
        self
    }

    /// Set the error placeholder
    #[must_use]
    pub fn error(mut self, label: impl Into<String>) -> Self {
        self.error = Some(label.into());
        self
    }

    /// Set the empty placeholder
    #[must_use]
    pub fn empty(mut self, label: impl Into<String>) -> Self {
        self.empty = Some(label.into());
        self
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// HTTP page source definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL for API requests
    pub base_url: String,

    /// Path appended to the base URL
    #[serde(default)]
    pub path: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Query parameter carrying the page size
    #[serde(default)]
    pub page_size_param: Option<String>,

    /// Dot path to the records array (empty = the body is the array)
    #[serde(default)]
    pub records_path: String,

    /// Dot path to the total page count
    #[serde(default)]
    pub total_pages_path: Option<String>,

    /// Static query parameters
    #[serde(default)]
    pub query: HashMap<String, String>,

    /// Static headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_page_param() -> String {
    "page".to_string()
}

impl SourceConfig {
    /// Create a source for `base_url` with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: String::new(),
            page_param: default_page_param(),
            page_size_param: None,
            records_path: String::new(),
            total_pages_path: None,
            query: HashMap::new(),
            headers: HashMap::new(),
            http: HttpConfig::default(),
        }
    }

    /// Validate source settings
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::missing_field("source.base_url"));
        }
        url::Url::parse(&self.base_url)?;
        if self.page_param.is_empty() {
            return Err(Error::invalid_value("source.page_param", "cannot be empty"));
        }
        Ok(())
    }

    /// Full request URL without query
    pub fn url(&self) -> String {
        if self.path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Rate limit (none = unlimited)
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            requests_per_second: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a config file; `.json` files are parsed as JSON, anything else as YAML
pub fn load_config(path: impl AsRef<Path>) -> Result<PagerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_config_from_json(&content)
    } else {
        load_config_from_str(&content)
    }
}

/// Load and validate a YAML config string
pub fn load_config_from_str(yaml: &str) -> Result<PagerConfig> {
    let config: PagerConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a JSON config string
pub fn load_config_from_json(json: &str) -> Result<PagerConfig> {
    let config: PagerConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}
