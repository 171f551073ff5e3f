//! News sentiment for stock tickers
//!
//! This crate turns a ticker into a one-word sentiment verdict by chaining
//! three external services:
//!
//! - Metaphor search finds recent news URLs for the ticker
//! - SMMRY condenses each page into a short summary
//! - Google Cloud Natural Language scores each summary
//!
//! Each summary casts a vote of -1, 0 or +1 (see [`sentiment`]); the mean of
//! the votes decides the verdict.
//!
//! # Example
//!
//! ```rust,no_run
//! use pulse_stock::{PulseConfig, SentimentPipeline, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PulseConfig::from_env()?;
//!     let pipeline = SentimentPipeline::from_config(&config)?;
//!
//!     let ticker = Ticker::parse("AAPL")?;
//!     let report = pipeline.run(&ticker, &mut std::io::stdout()).await?;
//!     println!("average vote: {:.2}", report.verdict.average);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod report;
pub mod sentiment;
pub mod ticker;

// Re-export main types for convenience
pub use config::{
    LanguageConfig, LanguageCredentials, MetaphorConfig, PulseConfig, SearchOptions, SmmryConfig,
};
pub use error::{PulseError, Result};
pub use pipeline::SentimentPipeline;
pub use provider::{NewsSearch, SentimentAnalyzer, Summarizer, Summary};
pub use report::SentimentReport;
pub use sentiment::{Label, SentimentReading, Verdict};
pub use ticker::Ticker;
