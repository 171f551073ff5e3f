//! Search → summarize → score pipeline
//!
//! Stages run strictly in order and each one finishes its whole list before
//! the next starts. The first error from any stage aborts the run; work
//! already done is discarded.

use crate::api::{LanguageClient, MetaphorClient, SmmryClient};
use crate::config::PulseConfig;
use crate::error::{PulseError, Result};
use crate::provider::{NewsSearch, SentimentAnalyzer, Summarizer, Summary};
use crate::report::{SentimentReport, SourceOutcome, source_line, verdict_line};
use crate::sentiment::{Label, Verdict};
use crate::ticker::Ticker;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Runs the three service stages for a ticker
pub struct SentimentPipeline {
    search: Arc<dyn NewsSearch>,
    summarizer: Arc<dyn Summarizer>,
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl SentimentPipeline {
    pub fn new(
        search: Arc<dyn NewsSearch>,
        summarizer: Arc<dyn Summarizer>,
        analyzer: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        Self {
            search,
            summarizer,
            analyzer,
        }
    }

    /// Build the pipeline on top of the real HTTP clients
    pub fn from_config(config: &PulseConfig) -> Result<Self> {
        config.validate()?;

        let search = MetaphorClient::new(config.metaphor.clone(), config.search.clone())?;
        let summarizer = SmmryClient::new(config.smmry.clone())?;
        let analyzer = LanguageClient::new(config.language.clone())?;

        Ok(Self::new(
            Arc::new(search),
            Arc::new(summarizer),
            Arc::new(analyzer),
        ))
    }

    /// Summarize every URL, in order, stopping at the first failure
    pub async fn summarize_all(&self, urls: &[String]) -> Result<Vec<Summary>> {
        let mut summaries = Vec::with_capacity(urls.len());
        for url in urls {
            debug!(service = self.summarizer.name(), %url, "Summarizing");
            summaries.push(self.summarizer.summarize(url).await?);
        }
        Ok(summaries)
    }

    /// Run the whole pipeline.
    ///
    /// Each `Source N: <label>` line is written to `out` as soon as that
    /// source is scored; the verdict line follows the last source.
    #[instrument(skip(self, ticker, out), fields(ticker = %ticker))]
    pub async fn run<W: Write>(
        &self,
        ticker: &Ticker,
        out: &mut W,
    ) -> Result<SentimentReport> {
        info!(service = self.search.name(), "Searching for news");
        let urls = self.search.find_urls(ticker.as_str()).await?;
        if urls.is_empty() {
            return Err(PulseError::NoSources(ticker.to_string()));
        }
        info!(count = urls.len(), "Found news sources");

        let summaries = self.summarize_all(&urls).await?;
        info!(count = summaries.len(), "Summaries fetched");

        let mut sources = Vec::with_capacity(summaries.len());
        for (index, summary) in summaries.into_iter().enumerate() {
            let reading = self.analyzer.analyze(&summary.content).await?;
            let label = reading.classify();
            debug!(
                service = self.analyzer.name(),
                url = %summary.url,
                magnitude = reading.magnitude,
                score = reading.score,
                %label,
                "Scored source"
            );

            writeln!(out, "{}", source_line(index + 1, label))?;
            out.flush()?;

            sources.push(SourceOutcome {
                url: summary.url,
                title: summary.title,
                reading,
                label,
            });
        }

        let labels: Vec<Label> = sources.iter().map(|s| s.label).collect();
        let verdict = Verdict::from_labels(&labels)?;
        writeln!(out, "{}", verdict_line(verdict.label))?;
        out.flush()?;

        info!(average = verdict.average, label = %verdict.label, "Sentiment verdict");
        Ok(SentimentReport::new(ticker.clone(), sources, verdict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockNewsSearch, MockSentimentAnalyzer, MockSummarizer};
    use crate::sentiment::SentimentReading;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn search_returning(urls: &[&str]) -> MockNewsSearch {
        let urls: Vec<String> = urls.iter().map(|u| (*u).to_string()).collect();
        let mut search = MockNewsSearch::new();
        search.expect_name().return_const("mock-search");
        search
            .expect_find_urls()
            .with(eq("AAPL"))
            .times(1)
            .returning(move |_| Ok(urls.clone()));
        search
    }

    fn echo_summarizer() -> MockSummarizer {
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_name().return_const("mock-summarizer");
        summarizer.expect_summarize().returning(|url| {
            Ok(Summary {
                url: url.to_string(),
                title: None,
                content: format!("text for {url}"),
            })
        });
        summarizer
    }

    fn analyzer_with(readings: Vec<SentimentReading>) -> MockSentimentAnalyzer {
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_name().return_const("mock-analyzer");
        let mut seq = Sequence::new();
        for reading in readings {
            analyzer
                .expect_analyze()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(reading));
        }
        analyzer
    }

    fn pipeline(
        search: MockNewsSearch,
        summarizer: MockSummarizer,
        analyzer: MockSentimentAnalyzer,
    ) -> SentimentPipeline {
        SentimentPipeline::new(Arc::new(search), Arc::new(summarizer), Arc::new(analyzer))
    }

    fn ticker() -> Ticker {
        Ticker::parse("aapl").unwrap()
    }

    #[tokio::test]
    async fn test_run_prints_each_source_then_verdict() {
        let pipeline = pipeline(
            search_returning(&["u1", "u2", "u3", "u4", "u5"]),
            echo_summarizer(),
            analyzer_with(vec![
                SentimentReading::new(2.0, 0.6),
                SentimentReading::new(3.1, 0.5),
                SentimentReading::new(0.4, 0.9),
                SentimentReading::new(1.5, -0.7),
                SentimentReading::new(1.2, 0.25),
            ]),
        );

        let mut out = Vec::new();
        let report = pipeline.run(&ticker(), &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Source 1: positive\n\
             Source 2: positive\n\
             Source 3: neutral\n\
             Source 4: negative\n\
             Source 5: positive\n\
             Today's sentiment: positive\n"
        );
        assert_eq!(report.verdict.label, Label::Positive);
        assert!((report.verdict.average - 0.4).abs() < 1e-12);
        assert_eq!(report.sources.len(), 5);
        assert_eq!(report.sources[3].url, "u4");
    }

    #[tokio::test]
    async fn test_summaries_are_scored_in_search_order() {
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_name().return_const("mock-analyzer");
        let mut seq = Sequence::new();
        for url in ["b", "a", "b"] {
            analyzer
                .expect_analyze()
                .with(eq(format!("text for {url}")))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(SentimentReading::new(0.0, 0.0)));
        }

        let mut search = MockNewsSearch::new();
        search.expect_name().return_const("mock-search");
        search
            .expect_find_urls()
            .returning(|_| Ok(vec!["b".to_string(), "a".to_string(), "b".to_string()]));

        let pipeline = pipeline(search, echo_summarizer(), analyzer);
        let report = pipeline.run(&ticker(), &mut Vec::new()).await.unwrap();

        let urls: Vec<&str> = report.sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["b", "a", "b"]);
        assert_eq!(report.verdict.label, Label::Neutral);
    }

    #[tokio::test]
    async fn test_no_search_results_is_rejected() {
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().never();
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_analyze().never();

        let pipeline = pipeline(search_returning(&[]), summarizer, analyzer);
        let mut out = Vec::new();
        let err = pipeline.run(&ticker(), &mut out).await.unwrap_err();

        assert!(matches!(err, PulseError::NoSources(ref t) if t == "AAPL"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_aborts() {
        let mut search = MockNewsSearch::new();
        search.expect_name().return_const("mock-search");
        search
            .expect_find_urls()
            .returning(|_| Err(PulseError::api("Metaphor", "401 Unauthorized")));
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().never();

        let pipeline = pipeline(search, summarizer, MockSentimentAnalyzer::new());
        let err = pipeline.run(&ticker(), &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_first_summary_failure_stops_remaining_work() {
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_name().return_const("mock-summarizer");
        summarizer
            .expect_summarize()
            .with(eq("u1"))
            .times(1)
            .returning(|url| {
                Ok(Summary {
                    url: url.to_string(),
                    ..Summary::default()
                })
            });
        summarizer
            .expect_summarize()
            .with(eq("u2"))
            .times(1)
            .returning(|_| Err(PulseError::api("SMMRY", "error 3: daily limit")));
        summarizer.expect_summarize().with(eq("u3")).never();

        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_analyze().never();

        let pipeline = pipeline(search_returning(&["u1", "u2", "u3"]), summarizer, analyzer);
        let mut out = Vec::new();
        let err = pipeline.run(&ticker(), &mut out).await.unwrap_err();

        assert!(matches!(err, PulseError::ApiError { service: "SMMRY", .. }));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_sentiment_aborts_after_printed_sources() {
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_name().return_const("mock-analyzer");
        let mut seq = Sequence::new();
        analyzer
            .expect_analyze()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(SentimentReading::new(2.0, -0.5)));
        analyzer
            .expect_analyze()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(PulseError::malformed(
                    "Natural Language",
                    "missing documentSentiment",
                ))
            });

        let pipeline = pipeline(search_returning(&["u1", "u2"]), echo_summarizer(), analyzer);
        let mut out = Vec::new();
        let err = pipeline.run(&ticker(), &mut out).await.unwrap_err();

        assert!(matches!(err, PulseError::MalformedResponse { .. }));
        assert_eq!(String::from_utf8(out).unwrap(), "Source 1: negative\n");
    }

    #[tokio::test]
    async fn test_summarize_all_keeps_empty_content() {
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_name().return_const("mock-summarizer");
        summarizer.expect_summarize().returning(|url| {
            Ok(Summary {
                url: url.to_string(),
                ..Summary::default()
            })
        });

        let pipeline = pipeline(MockNewsSearch::new(), summarizer, MockSentimentAnalyzer::new());
        let urls = vec!["x".to_string(), "x".to_string()];
        let summaries = pipeline.summarize_all(&urls).await.unwrap();

        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.content.is_empty()));
    }
}
