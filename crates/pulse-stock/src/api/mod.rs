//! API clients for the search, summarization and sentiment services

pub mod language;
pub mod metaphor;
pub mod smmry;

pub use language::{AnalyzeSentimentResponse, LanguageClient};
pub use metaphor::{ContentsResponse, MetaphorClient, SearchRequest, SearchResponse, extract_urls};
pub use smmry::{SmmryClient, SmmryResponse};
