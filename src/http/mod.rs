//! HTTP page source module
//!
//! Fetches numbered pages of JSON records over HTTP.
//!
//! # Features
//!
//! - **Page Source**: `HttpPageSource` implements `PageFetcher` for page-numbered APIs
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Total Pages Discovery**: Remembers the total page count a response reports

mod client;
mod rate_limit;
mod source;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use source::{extract_page_count, extract_path, extract_records, HttpPageSource};

#[cfg(test)]
mod tests;
