use anyhow::Context;
use clap::{Parser, ValueEnum};
use resumerank_core::{load_candidates, Document};
use resumerank_similarity::{RankerConfig, RankingEngine, RankingReport, RankingWorker};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Rank candidate documents against a query by TF-IDF cosine similarity
#[derive(Parser, Debug)]
#[command(name = "resumerank")]
#[command(about = "Rank documents against a query by textual relevance", long_about = None)]
struct Args {
    /// Candidate text files, ranked against the query
    candidates: Vec<PathBuf>,

    /// Query text (e.g. a job description)
    #[arg(short, long, conflicts_with = "query_file")]
    query: Option<String>,

    /// Read the query text from a file
    #[arg(long)]
    query_file: Option<PathBuf>,

    /// Match threshold in percent [default: 20]
    #[arg(short, long)]
    threshold: Option<String>,

    /// Add an advisory decision-tree label to each result
    #[arg(long)]
    classifier: bool,

    /// Seed for the advisory classifier's tie-breaking
    #[arg(long, requires = "classifier")]
    seed: Option<u64>,

    /// Drop terms shorter than this many characters
    #[arg(long)]
    min_token_len: Option<usize>,

    /// JSON ranker config; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a RankingReport,
    /// Ascending by score, for horizontal bar charts
    chart: Vec<(String, f64)>,
}

fn build_config(args: &Args) -> anyhow::Result<RankerConfig> {
    let mut config = match &args.config {
        Some(path) => RankerConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RankerConfig::default(),
    };

    if let Some(threshold) = &args.threshold {
        config.threshold = threshold.parse()?;
    }
    if args.classifier {
        let mut classifier = config.classifier.unwrap_or_default();
        if let Some(seed) = args.seed {
            classifier.seed = seed;
        }
        config.classifier = Some(classifier);
    }
    if let Some(min_token_len) = args.min_token_len {
        config.tokenizer.min_token_len = min_token_len;
    }

    config.validate()?;
    Ok(config)
}

fn read_query(args: &Args) -> anyhow::Result<String> {
    match (&args.query, &args.query_file) {
        (Some(query), _) => Ok(query.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read query file {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

/// Everything one ranking run needs, assembled from the command line
#[derive(Debug)]
struct RankRequest {
    config: RankerConfig,
    query: String,
    candidates: Vec<Document>,
}

/// `None` when no candidates were given. That check comes before any
/// flag or config validation, so an empty selection is always a no-op.
fn prepare_request(args: &Args) -> anyhow::Result<Option<RankRequest>> {
    if args.candidates.is_empty() {
        return Ok(None);
    }

    let config = build_config(args)?;
    let query = read_query(args)?;
    let candidates = load_candidates(&args.candidates);

    Ok(Some(RankRequest {
        config,
        query,
        candidates,
    }))
}

fn print_report(report: &RankingReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for line in report.display_lines() {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                report,
                chart: report.chart_series(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let Some(RankRequest {
        config,
        query,
        candidates,
    }) = prepare_request(&args)?
    else {
        info!("No candidate documents selected, nothing to rank");
        return Ok(());
    };
    info!("Ranking {} candidates (threshold {}%)", candidates.len(), config.threshold.percent());

    let engine = RankingEngine::new(config)?;
    let (worker, receiver) = RankingWorker::spawn(engine)?;
    worker.submit(query, candidates);

    let wait = tokio::task::spawn_blocking(move || receiver.recv());

    let outcome = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, cancelling ranking");
            worker.cancel();
            drop(worker);
            return Ok(());
        }
        outcome = wait => outcome?,
    };

    let outcome = outcome.context("ranking worker stopped before finishing")?;
    match outcome.result {
        Ok(report) => print_report(&report, args.format),
        Err(e) if e.is_benign() => {
            info!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
