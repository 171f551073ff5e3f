//! SMMRY summarization API client

use crate::config::SmmryConfig;
use crate::error::{PulseError, Result};
use crate::provider::{Summarizer, Summary};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const SERVICE: &str = "SMMRY";

/// Raw SMMRY response.
///
/// SMMRY reports failures inside a 200 body through `sm_api_error` and
/// `sm_api_message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmmryResponse {
    #[serde(default)]
    pub sm_api_character_count: Option<String>,
    #[serde(default)]
    pub sm_api_content_reduced: Option<String>,
    #[serde(default)]
    pub sm_api_title: Option<String>,
    #[serde(default)]
    pub sm_api_content: Option<String>,
    #[serde(default)]
    pub sm_api_limitation: Option<String>,
    #[serde(default)]
    pub sm_api_error: Option<i64>,
    #[serde(default)]
    pub sm_api_message: Option<String>,
}

impl SmmryResponse {
    /// Turn the body into a summary, or the error it reports
    pub fn into_summary(self, url: &str) -> Result<Summary> {
        if let Some(code) = self.sm_api_error {
            let message = self
                .sm_api_message
                .unwrap_or_else(|| "no message".to_string());
            return Err(PulseError::api(
                SERVICE,
                format!("error {code} for {url}: {message}"),
            ));
        }

        Ok(Summary {
            url: url.to_string(),
            title: self.sm_api_title.filter(|t| !t.is_empty()),
            content: self.sm_api_content.unwrap_or_default(),
        })
    }
}

/// SMMRY API client
#[derive(Debug, Clone)]
pub struct SmmryClient {
    client: Client,
    config: SmmryConfig,
}

impl SmmryClient {
    pub fn new(config: SmmryConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    /// Query parameters for one URL. SMMRY expects `SM_URL` last.
    fn params<'a>(&'a self, url: &'a str, length: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("SM_API_KEY", self.config.api_key.as_str()),
            ("SM_LENGTH", length),
            ("SM_URL", url),
        ]
    }

    fn summary_request(&self, url: &str) -> RequestBuilder {
        let length = self.config.summary_length.to_string();
        let params = self.params(url, &length);
        self.client.get(&self.config.api_base).query(&params[..])
    }

    /// Fetch the raw response for a URL
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<SmmryResponse> {
        let response = self.summary_request(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PulseError::api(SERVICE, format!("HTTP {status}: {body}")));
        }

        let body: SmmryResponse = response.json().await?;
        debug!(
            characters = body.sm_api_character_count.as_deref().unwrap_or("?"),
            reduced = body.sm_api_content_reduced.as_deref().unwrap_or("?"),
            "SMMRY summary received"
        );
        if let Some(limitation) = &body.sm_api_limitation {
            debug!(%limitation, "SMMRY quota");
        }
        Ok(body)
    }
}

#[async_trait]
impl Summarizer for SmmryClient {
    async fn summarize(&self, url: &str) -> Result<Summary> {
        self.fetch(url).await?.into_summary(url)
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
