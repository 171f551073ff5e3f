//! Metaphor search API client
//!
//! Search is a two step exchange: `POST /search` ranks results, then
//! `GET /contents` resolves those result ids into their page contents.

use crate::config::{MetaphorConfig, SearchOptions};
use crate::error::{PulseError, Result};
use crate::provider::NewsSearch;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const SERVICE: &str = "Metaphor";

/// Body of a `POST /search` request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub num_results: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    pub start_published_date: String,
    pub use_autoprompt: bool,
}

impl SearchRequest {
    /// Build the news query for a ticker, limited to results published
    /// at or after `since`
    pub fn for_ticker(ticker: &str, options: &SearchOptions, since: DateTime<Utc>) -> Self {
        Self {
            query: format!("news on {ticker}"),
            num_results: options.num_results,
            include_domains: options.domains.clone(),
            start_published_date: since.to_rfc3339_opts(SecondsFormat::Secs, true),
            use_autoprompt: options.use_autoprompt,
        }
    }
}

/// One ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// The rewritten query when autoprompt is on
    #[serde(default)]
    pub autoprompt_string: Option<String>,
}

impl SearchResponse {
    pub fn ids(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.id.as_str()).collect()
    }
}

/// Page contents for one search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentsResponse {
    #[serde(default)]
    pub contents: Vec<DocumentContent>,
}

/// Pull the URLs out of a contents response, in order, duplicates included
pub fn extract_urls(response: &ContentsResponse) -> Vec<String> {
    response.contents.iter().map(|c| c.url.clone()).collect()
}

/// Metaphor API client
#[derive(Debug, Clone)]
pub struct MetaphorClient {
    client: Client,
    config: MetaphorConfig,
    options: SearchOptions,
}

impl MetaphorClient {
    /// Create a client with the given search filters
    pub fn new(config: MetaphorConfig, options: SearchOptions) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            options,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base.trim_end_matches('/'))
    }

    fn search_request(&self, request: &SearchRequest) -> RequestBuilder {
        self.client
            .post(self.endpoint("search"))
            .header("x-api-key", &self.config.api_key)
            .json(request)
    }

    /// One `ids` pair per result id
    fn contents_request(&self, ids: &[&str]) -> RequestBuilder {
        let params: Vec<(&str, &str)> = ids.iter().map(|id| ("ids", *id)).collect();
        self.client
            .get(self.endpoint("contents"))
            .header("x-api-key", &self.config.api_key)
            .query(&params)
    }

    /// Run a search
    #[instrument(skip(self, request), fields(query = %request.query))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        debug!(
            num_results = request.num_results,
            domains = request.include_domains.len(),
            since = %request.start_published_date,
            "Sending Metaphor search"
        );

        let response = self.search_request(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PulseError::api(
                SERVICE,
                format!("search failed with {status}: {body}"),
            ));
        }

        let body: SearchResponse = response.json().await?;
        if let Some(prompt) = &body.autoprompt_string {
            debug!(autoprompt = %prompt, "Metaphor rewrote the query");
        }
        Ok(body)
    }

    /// Fetch contents for previously returned result ids
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_contents(&self, ids: &[&str]) -> Result<ContentsResponse> {
        if ids.is_empty() {
            return Ok(ContentsResponse::default());
        }

        let response = self.contents_request(ids).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PulseError::api(
                SERVICE,
                format!("contents failed with {status}: {body}"),
            ));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl NewsSearch for MetaphorClient {
    async fn find_urls(&self, ticker: &str) -> Result<Vec<String>> {
        let request = SearchRequest::for_ticker(ticker, &self.options, Utc::now());
        let results = self.search(&request).await?;
        let contents = self.get_contents(&results.ids()).await?;
        Ok(extract_urls(&contents))
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
