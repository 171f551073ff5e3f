//! Configuration for the news sentiment pipeline
//!
//! Every external service gets its own config object carrying its key, base
//! URL and timeout. Credentials are always passed in explicitly; nothing is
//! discovered from the ambient environment once a [`PulseConfig`] exists.

use crate::error::{PulseError, Result};
use pulse_utils::{optional_var, require_var};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_METAPHOR_API_BASE: &str = "https://api.metaphor.systems";
pub const DEFAULT_SMMRY_API_BASE: &str = "https://api.smmry.com";
pub const DEFAULT_LANGUAGE_API_BASE: &str = "https://language.googleapis.com/v2";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NUM_RESULTS: u32 = 5;
const DEFAULT_SUMMARY_LENGTH: u32 = 3;
const DEFAULT_DOMAINS: [&str; 5] = [
    "cnbc.com",
    "fool.com",
    "cnn.com",
    "foxbusiness.com",
    "reddit.com",
];

fn parse_timeout_env() -> Result<Option<u64>> {
    optional_var("STONK_HTTP_TIMEOUT_SECS")?
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                PulseError::ConfigError(format!(
                    "STONK_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })
        })
        .transpose()
}

fn validate_base(service: &str, api_base: &str) -> Result<()> {
    let url = Url::parse(api_base).map_err(|e| {
        PulseError::ConfigError(format!(
            "{service} API base {api_base:?} is not a valid URL: {e}"
        ))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PulseError::ConfigError(format!(
            "{service} API base must be http(s), got {api_base:?}"
        )));
    }
    Ok(())
}

fn validate_key(service: &str, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(PulseError::ConfigError(format!("{service} API key is empty")));
    }
    Ok(())
}

/// Metaphor search service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaphorConfig {
    pub api_key: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl MetaphorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_METAPHOR_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads `METAPHOR_API_KEY` and the optional `METAPHOR_API_BASE`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(require_var("METAPHOR_API_KEY")?);
        if let Some(base) = optional_var("METAPHOR_API_BASE")? {
            config.api_base = base;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// SMMRY summarization service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmmryConfig {
    pub api_key: String,
    pub api_base: String,
    pub timeout_secs: u64,
    /// Number of sentences requested per summary (`SM_LENGTH`)
    pub summary_length: u32,
}

impl SmmryConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_SMMRY_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            summary_length: DEFAULT_SUMMARY_LENGTH,
        }
    }

    /// Reads `SMMRY_API_KEY` and the optional `SMMRY_API_BASE`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(require_var("SMMRY_API_KEY")?);
        if let Some(base) = optional_var("SMMRY_API_BASE")? {
            config.api_base = base;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_summary_length(mut self, sentences: u32) -> Self {
        self.summary_length = sentences;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How requests to the Natural Language API are authorized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageCredentials {
    /// Sent as the `key` query parameter
    ApiKey(String),
    /// OAuth2 access token, sent as a bearer token
    AccessToken(String),
}

impl LanguageCredentials {
    fn secret(&self) -> &str {
        match self {
            Self::ApiKey(key) | Self::AccessToken(key) => key,
        }
    }
}

/// Google Cloud Natural Language service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub credentials: LanguageCredentials,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl LanguageConfig {
    pub fn new(credentials: LanguageCredentials) -> Self {
        Self {
            credentials,
            api_base: DEFAULT_LANGUAGE_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::new(LanguageCredentials::ApiKey(api_key.into()))
    }

    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self::new(LanguageCredentials::AccessToken(token.into()))
    }

    /// Reads `GOOGLE_LANGUAGE_API_KEY`, falling back to `GOOGLE_ACCESS_TOKEN`,
    /// plus the optional `GOOGLE_LANGUAGE_API_BASE`
    pub fn from_env() -> Result<Self> {
        let credentials = match (
            optional_var("GOOGLE_LANGUAGE_API_KEY")?,
            optional_var("GOOGLE_ACCESS_TOKEN")?,
        ) {
            (Some(key), _) => LanguageCredentials::ApiKey(key),
            (None, Some(token)) => LanguageCredentials::AccessToken(token),
            (None, None) => {
                return Err(PulseError::ConfigError(
                    "set GOOGLE_LANGUAGE_API_KEY or GOOGLE_ACCESS_TOKEN".to_string(),
                ));
            }
        };

        let mut config = Self::new(credentials);
        if let Some(base) = optional_var("GOOGLE_LANGUAGE_API_BASE")? {
            config.api_base = base;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Filters applied to the news search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// How many results to ask for
    pub num_results: u32,
    /// Only return results from these domains; empty means no filter
    pub domains: Vec<String>,
    /// Let the search service rewrite the query
    pub use_autoprompt: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            domains: DEFAULT_DOMAINS.iter().map(|d| (*d).to_string()).collect(),
            use_autoprompt: true,
        }
    }
}

/// Configuration for one sentiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    pub metaphor: MetaphorConfig,
    pub smmry: SmmryConfig,
    pub language: LanguageConfig,
    pub search: SearchOptions,
}

impl PulseConfig {
    /// Create a new configuration builder
    pub fn builder() -> PulseConfigBuilder {
        PulseConfigBuilder::default()
    }

    /// Load every service config from environment variables.
    ///
    /// `STONK_HTTP_TIMEOUT_SECS`, when set, overrides all three timeouts.
    pub fn from_env() -> Result<Self> {
        let mut metaphor = MetaphorConfig::from_env()?;
        let mut smmry = SmmryConfig::from_env()?;
        let mut language = LanguageConfig::from_env()?;

        if let Some(secs) = parse_timeout_env()? {
            metaphor.timeout_secs = secs;
            smmry.timeout_secs = secs;
            language.timeout_secs = secs;
        }

        let config = Self {
            metaphor,
            smmry,
            language,
            search: SearchOptions::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_key("Metaphor", &self.metaphor.api_key)?;
        validate_key("SMMRY", &self.smmry.api_key)?;
        validate_key("Natural Language", self.language.credentials.secret())?;

        validate_base("Metaphor", &self.metaphor.api_base)?;
        validate_base("SMMRY", &self.smmry.api_base)?;
        validate_base("Natural Language", &self.language.api_base)?;

        if self.search.num_results == 0 {
            return Err(PulseError::ConfigError(
                "num_results must be greater than 0".to_string(),
            ));
        }

        if self.smmry.summary_length == 0 {
            return Err(PulseError::ConfigError(
                "summary_length must be greater than 0".to_string(),
            ));
        }

        if [
            self.metaphor.timeout_secs,
            self.smmry.timeout_secs,
            self.language.timeout_secs,
        ]
        .contains(&0)
        {
            return Err(PulseError::ConfigError(
                "HTTP timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for PulseConfig
#[derive(Debug, Default)]
pub struct PulseConfigBuilder {
    metaphor: Option<MetaphorConfig>,
    smmry: Option<SmmryConfig>,
    language: Option<LanguageConfig>,
    num_results: Option<u32>,
    domains: Option<Vec<String>>,
    use_autoprompt: Option<bool>,
    summary_length: Option<u32>,
}

impl PulseConfigBuilder {
    /// Seed the builder from an existing config
    pub fn from_config(config: PulseConfig) -> Self {
        Self {
            metaphor: Some(config.metaphor),
            smmry: Some(config.smmry),
            language: Some(config.language),
            num_results: Some(config.search.num_results),
            domains: Some(config.search.domains),
            use_autoprompt: Some(config.search.use_autoprompt),
            summary_length: None,
        }
    }

    pub fn metaphor(mut self, config: MetaphorConfig) -> Self {
        self.metaphor = Some(config);
        self
    }

    pub fn smmry(mut self, config: SmmryConfig) -> Self {
        self.smmry = Some(config);
        self
    }

    pub fn language(mut self, config: LanguageConfig) -> Self {
        self.language = Some(config);
        self
    }

    pub fn num_results(mut self, count: u32) -> Self {
        self.num_results = Some(count);
        self
    }

    /// Replace the default domain filter
    pub fn domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = Some(domains.into_iter().map(Into::into).collect());
        self
    }

    pub fn use_autoprompt(mut self, enabled: bool) -> Self {
        self.use_autoprompt = Some(enabled);
        self
    }

    /// Override the SMMRY sentence count
    pub fn summary_length(mut self, sentences: u32) -> Self {
        self.summary_length = Some(sentences);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PulseConfig> {
        let defaults = SearchOptions::default();

        let metaphor = self
            .metaphor
            .ok_or_else(|| PulseError::ConfigError("Metaphor config is required".to_string()))?;
        let mut smmry = self
            .smmry
            .ok_or_else(|| PulseError::ConfigError("SMMRY config is required".to_string()))?;
        let language = self.language.ok_or_else(|| {
            PulseError::ConfigError("Natural Language config is required".to_string())
        })?;

        if let Some(sentences) = self.summary_length {
            smmry.summary_length = sentences;
        }

        let config = PulseConfig {
            metaphor,
            smmry,
            language,
            search: SearchOptions {
                num_results: self.num_results.unwrap_or(defaults.num_results),
                domains: self.domains.unwrap_or(defaults.domains),
                use_autoprompt: self.use_autoprompt.unwrap_or(defaults.use_autoprompt),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
