//! Command-line interface for stonk-pulse
//!
//! Reads a ticker (from `--ticker` or the first line of stdin), runs the news
//! sentiment pipeline and prints one line per source plus the verdict.
//!
//! # Usage
//!
//! ```bash
//! # .env in the working directory
//! METAPHOR_API_KEY=...
//! SMMRY_API_KEY=...
//! GOOGLE_LANGUAGE_API_KEY=...
//!
//! echo AAPL | cargo run --bin stonk-pulse
//! ```

use anyhow::Context;
use clap::Parser;
use pulse_stock::config::PulseConfigBuilder;
use pulse_stock::{PulseConfig, SentimentPipeline, Ticker};
use pulse_utils::EnvError;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const DEFAULT_LOG_FILTER: &str = "warn,pulse_stock=info,stonk_pulse=info";
const VERBOSE_LOG_FILTER: &str = "info,pulse_stock=debug,stonk_pulse=debug";

#[derive(Parser, Debug)]
#[command(name = "stonk-pulse")]
#[command(about = "Today's news sentiment for a stock ticker", long_about = None)]
struct Args {
    /// Ticker to look up; read from stdin when omitted
    #[arg(short, long)]
    ticker: Option<String>,

    /// Number of news results to score
    #[arg(short, long)]
    num_results: Option<u32>,

    /// Sentences per summary
    #[arg(long)]
    summary_length: Option<u32>,

    /// Restrict search to this domain (repeatable, replaces the defaults)
    #[arg(long = "domain", value_name = "DOMAIN")]
    domains: Vec<String>,

    /// Send the query to search verbatim
    #[arg(long)]
    no_autoprompt: bool,

    /// Env file to load instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, mut builder: PulseConfigBuilder) -> PulseConfigBuilder {
        if let Some(count) = self.num_results {
            builder = builder.num_results(count);
        }
        if let Some(sentences) = self.summary_length {
            builder = builder.summary_length(sentences);
        }
        if !self.domains.is_empty() {
            builder = builder.domains(self.domains.iter().cloned());
        }
        if self.no_autoprompt {
            builder = builder.use_autoprompt(false);
        }
        builder
    }
}

fn read_ticker(args: &Args) -> anyhow::Result<Ticker> {
    if let Some(raw) = &args.ticker {
        return Ok(Ticker::parse(raw)?);
    }

    let mut stderr = io::stderr();
    write!(stderr, "Enter a stonk (ex: AAPL): ")?;
    stderr.flush()?;

    Ticker::read_from(io::stdin().lock()).context("failed to read ticker from stdin")
}

async fn run(args: Args, env_file: Result<Option<PathBuf>, EnvError>) -> anyhow::Result<()> {
    if let Some(path) = env_file? {
        info!(path = %path.display(), "Loaded env file");
    }

    let config = args
        .apply(PulseConfigBuilder::from_config(PulseConfig::from_env()?))
        .build()?;
    let pipeline = SentimentPipeline::from_config(&config)?;

    let ticker = read_ticker(&args)?;

    let mut stdout = io::stdout();
    pipeline.run(&ticker, &mut stdout).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Loaded before tracing so RUST_LOG may come from the file
    let env_file = pulse_utils::load_env_file(args.env_file.as_deref());

    pulse_utils::init_tracing_with_default(if args.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    });

    match run(args, env_file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
