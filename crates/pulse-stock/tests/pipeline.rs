//! End-to-end pipeline runs against in-memory services

use async_trait::async_trait;
use pulse_stock::{
    Label, NewsSearch, PulseError, Result, SentimentAnalyzer, SentimentPipeline, SentimentReading,
    Summarizer, Summary, Ticker,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

struct FixedSearch(Vec<&'static str>);

#[async_trait]
impl NewsSearch for FixedSearch {
    async fn find_urls(&self, _ticker: &str) -> Result<Vec<String>> {
        Ok(self.0.iter().map(|u| (*u).to_string()).collect())
    }

    fn name(&self) -> &'static str {
        "fixed-search"
    }
}

/// Records every URL it is asked about; the page text is the URL itself
#[derive(Default)]
struct RecordingSummarizer {
    seen: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

#[async_trait]
impl Summarizer for RecordingSummarizer {
    async fn summarize(&self, url: &str) -> Result<Summary> {
        self.seen.lock().expect("lock").push(url.to_string());
        if self.fail_on == Some(url) {
            return Err(PulseError::ApiError {
                service: "SMMRY",
                message: format!("could not fetch {url}"),
            });
        }
        Ok(Summary {
            url: url.to_string(),
            title: None,
            content: url.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "recording-summarizer"
    }
}

/// Looks readings up by the text it is given
struct TableAnalyzer(HashMap<&'static str, (f64, f64)>);

#[async_trait]
impl SentimentAnalyzer for TableAnalyzer {
    async fn analyze(&self, text: &str) -> Result<SentimentReading> {
        let (magnitude, score) = self.0.get(text).copied().unwrap_or((0.0, 0.0));
        Ok(SentimentReading::new(magnitude, score))
    }

    fn name(&self) -> &'static str {
        "table-analyzer"
    }
}

fn ticker() -> Ticker {
    Ticker::parse("NVDA\n").expect("ticker")
}

#[tokio::test]
async fn negative_news_flow() {
    let urls = vec!["n1", "n2", "n3", "calm"];
    let analyzer = TableAnalyzer(HashMap::from([
        ("n1", (2.5, -0.8)),
        ("n2", (1.1, -0.3)),
        ("n3", (4.0, -0.21)),
        ("calm", (0.2, -0.9)),
    ]));

    let pipeline = SentimentPipeline::new(
        Arc::new(FixedSearch(urls)),
        Arc::new(RecordingSummarizer::default()),
        Arc::new(analyzer),
    );

    let mut out = Vec::new();
    let report = assert_ok!(pipeline.run(&ticker(), &mut out).await);

    assert_eq!(report.verdict.label, Label::Negative);
    assert_eq!(report.verdict.average, -0.75);
    assert_eq!(report.ticker.as_str(), "NVDA");
    assert_eq!(String::from_utf8(out).expect("utf8"), report.render());
}

#[tokio::test]
async fn all_flat_readings_are_neutral() {
    let pipeline = SentimentPipeline::new(
        Arc::new(FixedSearch(vec!["a", "b", "c"])),
        Arc::new(RecordingSummarizer::default()),
        Arc::new(TableAnalyzer(HashMap::new())),
    );

    let mut out = Vec::new();
    let report = assert_ok!(pipeline.run(&ticker(), &mut out).await);

    assert_eq!(report.verdict.label, Label::Neutral);
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "Source 1: neutral\nSource 2: neutral\nSource 3: neutral\nToday's sentiment: neutral\n"
    );
}

#[tokio::test]
async fn summarizer_failure_stops_the_run() {
    let summarizer = Arc::new(RecordingSummarizer {
        fail_on: Some("second"),
        ..RecordingSummarizer::default()
    });

    let pipeline = SentimentPipeline::new(
        Arc::new(FixedSearch(vec!["first", "second", "third"])),
        summarizer.clone(),
        Arc::new(TableAnalyzer(HashMap::new())),
    );

    let mut out = Vec::new();
    let err = assert_err!(pipeline.run(&ticker(), &mut out).await);

    assert!(err.to_string().contains("could not fetch second"));
    assert_eq!(*summarizer.seen.lock().expect("lock"), vec!["first", "second"]);
    assert!(out.is_empty());
}

#[tokio::test]
async fn empty_search_never_reaches_aggregation() {
    let pipeline = SentimentPipeline::new(
        Arc::new(FixedSearch(Vec::new())),
        Arc::new(RecordingSummarizer::default()),
        Arc::new(TableAnalyzer(HashMap::new())),
    );

    let err = assert_err!(pipeline.run(&ticker(), &mut Vec::new()).await);
    assert!(matches!(err, PulseError::NoSources(_)));
}
