//! HTTP page source
//!
//! Fetches numbered pages of JSON records from a REST endpoint.
//! Common patterns:
//! - `GET /articles?page=2` → `[{...}, {...}]`
//! - `GET /articles?page=2&per_page=50` → `{ "data": [...], "meta": { "total_pages": 9 } }`

use super::client::{HttpClient, HttpClientConfig, RequestConfig};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::pagination::PageFetcher;
use crate::types::{JsonValue, PageNumber};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

/// [`PageFetcher`] over a page-numbered JSON API
#[derive(Debug)]
pub struct HttpPageSource {
    client: HttpClient,
    url: String,
    page_param: String,
    page_size: Option<(String, u32)>,
    records_path: String,
    total_pages_path: Option<String>,
    base_request: RequestConfig,
    /// 0 until a response reports the total page count
    last_total_pages: AtomicU32,
}

impl HttpPageSource {
    /// Build a source from its config; `items_per_page` is sent when a page size parameter is configured
    pub fn new(source: &SourceConfig, items_per_page: u32) -> Result<Self> {
        source.validate()?;
        let client = HttpClient::with_config(HttpClientConfig::from(&source.http))?;

        let mut base_request = RequestConfig::new();
        for (key, value) in &source.query {
            base_request = base_request.query(key, value);
        }
        for (key, value) in &source.headers {
            base_request = base_request.header(key, value);
        }

        Ok(Self {
            client,
            url: source.url(),
            page_param: source.page_param.clone(),
            page_size: source
                .page_size_param
                .clone()
                .map(|param| (param, items_per_page)),
            records_path: source.records_path.clone(),
            total_pages_path: source.total_pages_path.clone(),
            base_request,
            last_total_pages: AtomicU32::new(0),
        })
    }

    /// Total page count from the most recent response that reported one
    pub fn last_total_pages(&self) -> Option<PageNumber> {
        match self.last_total_pages.load(Ordering::SeqCst) {
            0 => None,
            total => Some(total),
        }
    }

    /// Request parameters for a page
    fn page_request(&self, page: PageNumber) -> RequestConfig {
        let mut request = self
            .base_request
            .clone()
            .query(&self.page_param, page.to_string());
        if let Some((param, size)) = &self.page_size {
            request = request.query(param, size.to_string());
        }
        request
    }
}

#[async_trait]
impl PageFetcher<JsonValue> for HttpPageSource {
    async fn fetch_page(&self, page: PageNumber) -> Result<Vec<JsonValue>> {
        let body: Value = self
            .client
            .get_json_with_config(&self.url, self.page_request(page))
            .await?;

        if let Some(path) = &self.total_pages_path {
            if let Some(total) = extract_page_count(&body, path) {
                debug!(page, total, "Response reported total pages");
                self.last_total_pages.store(total, Ordering::SeqCst);
            }
        }

        extract_records(&body, &self.records_path)
    }
}

/// Walk a dot path (`$.` prefix optional) through nested objects
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Take the records array at `path` out of a response body
pub fn extract_records(body: &Value, path: &str) -> Result<Vec<Value>> {
    match extract_path(body, path) {
        Some(Value::Array(records)) => Ok(records.clone()),
        Some(Value::Null) => Ok(Vec::new()),
        Some(other) => Err(Error::record_extraction(
            path,
            format!("expected an array, found {}", json_type_name(other)),
        )),
        None => Err(Error::record_extraction(path, "path not found in response")),
    }
}

/// Read a positive page count (number or numeric string) at `path`
pub fn extract_page_count(body: &Value, path: &str) -> Option<PageNumber> {
    let total = match extract_path(body, path)? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    PageNumber::try_from(total).ok().filter(|total| *total > 0)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
