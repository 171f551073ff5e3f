//! Run results and their text rendering

use crate::sentiment::{Label, SentimentReading, Verdict};
use crate::ticker::Ticker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything learned about one news source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub url: String,
    pub title: Option<String>,
    pub reading: SentimentReading,
    pub label: Label,
}

/// Result of one sentiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub ticker: Ticker,
    pub sources: Vec<SourceOutcome>,
    pub verdict: Verdict,
    pub timestamp: DateTime<Utc>,
}

impl SentimentReport {
    pub fn new(ticker: Ticker, sources: Vec<SourceOutcome>, verdict: Verdict) -> Self {
        Self {
            ticker,
            sources,
            verdict,
            timestamp: Utc::now(),
        }
    }

    /// Render the same lines the pipeline prints while running
    pub fn render(&self) -> String {
        let mut output = String::new();
        for (index, source) in self.sources.iter().enumerate() {
            output.push_str(&source_line(index + 1, source.label));
            output.push('\n');
        }
        output.push_str(&verdict_line(self.verdict.label));
        output.push('\n');
        output
    }
}

/// `Source N: <label>`, numbered from 1
pub fn source_line(position: usize, label: Label) -> String {
    format!("Source {position}: {label}")
}

/// `Today's sentiment: <label>`
pub fn verdict_line(label: Label) -> String {
    format!("Today's sentiment: {label}")
}
