//! Service traits consumed by the pipeline
//!
//! Each external capability sits behind a trait so the pipeline can be driven
//! by the real HTTP clients in [`crate::api`] or by test doubles.

use crate::error::Result;
use crate::sentiment::SentimentReading;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Condensed text for one news URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub url: String,
    pub title: Option<String>,
    /// Empty when the summarizer returned no content
    pub content: String,
}

/// Finds news URLs for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// Return result URLs in ranked order
    async fn find_urls(&self, ticker: &str) -> Result<Vec<String>>;

    /// Service name used in logs
    fn name(&self) -> &'static str;
}

/// Summarizes the page behind a URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, url: &str) -> Result<Summary>;

    fn name(&self) -> &'static str;
}

/// Scores plain text for sentiment
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentReading>;

    fn name(&self) -> &'static str;
}
