mod display;
mod export;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sentiboard_core::schema::records_to_batch;
use sentiboard_core::{
    Aggregator, Ingestor, Record, RecordFilter, RerunIntent, StopWords, Summary,
    aggregate::DEFAULT_TOP_WORDS,
};
use sentiboard_sync::ReportClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const BUNDLED_SAMPLE: &str = include_str!("../data/sample.csv");

#[derive(Parser)]
#[command(name = "sentiboard", version, about = "Sentiment report ingestion and dashboard views")]
struct Cli {
    /// Report backend base URL
    #[arg(long, env = "SENTIBOARD_API_BASE", default_value = "http://localhost:8000", global = true)]
    api_base: String,

    /// Sent as `x-api-key` on backend requests
    #[arg(long, env = "SENTIBOARD_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Stop-word table replacing the bundled English list
    #[arg(long, env = "SENTIBOARD_STOPWORDS", global = true)]
    stopwords: Option<PathBuf>,

    /// Length of the top-words view
    #[arg(long, default_value_t = DEFAULT_TOP_WORDS, global = true)]
    top_words: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical records of a CSV (or `.json`) report
    Ingest {
        /// Input file, or `-` for stdin
        input: PathBuf,
        /// Print an Arrow table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Print derived views and the summary as JSON
    Views {
        input: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print a plain-text report
    Report { input: PathBuf },
    /// Fetch the latest report CSV from the backend and print its views
    Fetch {
        /// Dataset used when the backend is unavailable
        #[arg(long)]
        sample: Option<PathBuf>,
    },
    /// Ask the backend to regenerate the report
    Rerun {
        #[arg(long, default_value_t = RerunIntent::Light)]
        intent: RerunIntent,
    },
    /// Write canonical records to Parquet
    Export {
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Exact sentiment label
    #[arg(long)]
    sentiment: Option<String>,
    /// Nature label; repeat for any-of
    #[arg(long = "nature")]
    natures: Vec<String>,
    /// Case-insensitive substring of the post text
    #[arg(long)]
    word: Option<String>,
    /// Only flagged posts unless another criterion is set
    #[arg(long)]
    flagged: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> RecordFilter {
        RecordFilter {
            sentiment: self.sentiment.clone(),
            nature: self.natures.clone(),
            word: self.word.clone(),
            dangerous_only: self.flagged,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!("sentiboard v{}", env!("CARGO_PKG_VERSION"));

    let custom_stop_words;
    let stop_words = match &cli.stopwords {
        Some(path) => {
            custom_stop_words = StopWords::from_path(path)?;
            info!(path = %path.display(), words = custom_stop_words.len(), "loaded stop-word table");
            &custom_stop_words
        }
        None => StopWords::english(),
    };
    let aggregator = Aggregator::new(stop_words).with_top_words(cli.top_words);

    match &cli.command {
        Command::Ingest { input, table } => {
            let records = ingest(input)?;
            if *table {
                let batch = records_to_batch(&records)?;
                println!("{}", arrow::util::pretty::pretty_format_batches(&[batch])?);
            } else {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        Command::Views { input, filter } => {
            let records = ingest(input)?;
            print_views(&aggregator, &filter.to_filter(), &records)?;
        }
        Command::Report { input } => {
            let records = ingest(input)?;
            let views = aggregator.aggregate(&records);
            let flagged = RecordFilter::flagged_view().apply(&records);
            display::write_report(&mut io::stdout().lock(), &Summary::of(&records), &views, &flagged)?;
        }
        Command::Fetch { sample } => {
            let client = ReportClient::new(cli.api_base.as_str(), cli.api_key.clone());
            let records = fetch_or_sample(&client, sample.as_deref()).await?;
            print_views(&aggregator, &RecordFilter::new(), &records)?;
        }
        Command::Rerun { intent } => {
            let client = ReportClient::new(cli.api_base.as_str(), cli.api_key.clone());
            let resp = client.rerun(*intent).await.context("rerun failed")?;
            if let Some(pdf) = resp.pdf.as_deref().filter(|p| !p.is_empty()) {
                for (kind, url) in report_links(&client, pdf) {
                    info!(kind, url = %url, "report ready");
                }
            }
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Command::Export { input, out } => {
            let records = ingest(input)?;
            export::write_parquet(out, &records)?;
        }
    }

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("reading stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

fn is_json(input: &Path) -> bool {
    input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn ingest(input: &Path) -> anyhow::Result<Vec<Record>> {
    let text = read_input(input)?;
    let ingestor = Ingestor::new();
    let records = if is_json(input) {
        ingestor.ingest_json(&text)?
    } else {
        ingestor.ingest_csv(&text)?
    };
    Ok(records)
}

fn print_views(
    aggregator: &Aggregator<'_>,
    filter: &RecordFilter,
    records: &[Record],
) -> anyhow::Result<()> {
    let selected = filter.apply(records);
    let output = serde_json::json!({
        "summary": Summary::of(&selected),
        "views": aggregator.aggregate(&selected),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Latest backend report, or the sample dataset when anything on the
/// backend path fails.
async fn fetch_or_sample(client: &ReportClient, sample: Option<&Path>) -> anyhow::Result<Vec<Record>> {
    let fetched = match client.fetch_report_csv().await {
        Ok(csv) => Ingestor::new().ingest_csv(&csv).map_err(anyhow::Error::from),
        Err(err) => Err(err.into()),
    };
    match fetched {
        Ok(records) => {
            info!(count = records.len(), base = client.base_url(), "loaded backend report");
            Ok(records)
        }
        Err(err) => {
            warn!(error = %err, "backend report unavailable, using sample data");
            load_sample(sample)
        }
    }
}

/// Where a finished report's PDF and word cloud can be fetched.
fn report_links(client: &ReportClient, pdf: &str) -> [(&'static str, String); 3] {
    let name = sentiboard_sync::http::file_name_of(pdf);
    [
        ("pdf_view", client.pdf_view_url(name)),
        ("pdf_download", client.pdf_download_url(name)),
        ("word_cloud", client.word_cloud_url()),
    ]
}

fn load_sample(sample: Option<&Path>) -> anyhow::Result<Vec<Record>> {
    let text = match sample {
        Some(path) => read_input(path)?,
        None => BUNDLED_SAMPLE.to_string(),
    };
    Ingestor::new()
        .ingest_csv(&text)
        .context("sample dataset is not a valid report")
}
