//! Google Cloud Natural Language client
//!
//! Calls `documents:analyzeSentiment` and reads the document-level magnitude
//! and score straight from the JSON response.

use crate::config::{LanguageConfig, LanguageCredentials};
use crate::error::{PulseError, Result};
use crate::provider::SentimentAnalyzer;
use crate::sentiment::SentimentReading;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const SERVICE: &str = "Natural Language";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSentimentRequest<'a> {
    pub document: Document<'a>,
    pub encoding_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Document<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: &'a str,
}

impl<'a> AnalyzeSentimentRequest<'a> {
    pub fn plain_text(content: &'a str) -> Self {
        Self {
            document: Document {
                kind: "PLAIN_TEXT",
                content,
            },
            encoding_type: "UTF8",
        }
    }
}

/// Sentiment block as it appears on the wire; either field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireSentiment {
    #[serde(default)]
    pub magnitude: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    pub text: TextSpan,
    #[serde(default)]
    pub sentiment: Option<WireSentiment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSentimentResponse {
    #[serde(default)]
    pub document_sentiment: Option<WireSentiment>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl AnalyzeSentimentResponse {
    /// The document-level reading; both fields are required
    pub fn reading(&self) -> Result<SentimentReading> {
        let sentiment = self
            .document_sentiment
            .as_ref()
            .ok_or_else(|| PulseError::malformed(SERVICE, "missing documentSentiment"))?;

        let magnitude = sentiment
            .magnitude
            .ok_or_else(|| PulseError::malformed(SERVICE, "missing documentSentiment.magnitude"))?;
        let score = sentiment
            .score
            .ok_or_else(|| PulseError::malformed(SERVICE, "missing documentSentiment.score"))?;

        Ok(SentimentReading::new(magnitude, score))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: String,
}

fn describe_error(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{status}: {}", envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body.to_string(),
    }
}

/// Natural Language API client
#[derive(Debug, Clone)]
pub struct LanguageClient {
    client: Client,
    config: LanguageConfig,
}

impl LanguageClient {
    pub fn new(config: LanguageConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/documents:analyzeSentiment",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.credentials {
            LanguageCredentials::ApiKey(key) => request.query(&[("key", key.as_str())]),
            LanguageCredentials::AccessToken(token) => request.bearer_auth(token),
        }
    }

    /// Run sentiment analysis on plain text
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn analyze_sentiment(&self, text: &str) -> Result<AnalyzeSentimentResponse> {
        let request = self
            .client
            .post(self.endpoint())
            .json(&AnalyzeSentimentRequest::plain_text(text));

        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PulseError::api(
                SERVICE,
                format!("HTTP {status}: {}", describe_error(&body)),
            ));
        }

        let body: AnalyzeSentimentResponse = response.json().await?;
        debug!(
            language = body.language_code.as_deref().unwrap_or("?"),
            sentences = body.sentences.len(),
            "Sentiment analyzed"
        );
        Ok(body)
    }
}

#[async_trait]
impl SentimentAnalyzer for LanguageClient {
    async fn analyze(&self, text: &str) -> Result<SentimentReading> {
        self.analyze_sentiment(text).await?.reading()
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
