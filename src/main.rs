use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::TypedValueParser;
use pubmed_paper_fetcher::config::DEFAULT_MAX_RESULTS;
use pubmed_paper_fetcher::report::sink;
use pubmed_paper_fetcher::{
    AffiliationClassifier, ClientConfig, KeywordSets, PaperFetchError, PaperFetcher, PubMedClient,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "get-papers-list",
    version,
    about = "Fetch research papers from PubMed with pharma/biotech affiliations",
    long_about = "Searches PubMed and lists papers with at least one author affiliated to a \
                  pharmaceutical or biotech company rather than an academic institution"
)]
struct Cli {
    /// PubMed search query (supports full PubMed syntax)
    #[arg(value_name = "QUERY")]
    query: String,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Output CSV filename (default: console output)
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Maximum number of search results to examine
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_MAX_RESULTS,
        value_parser = clap::value_parser!(u64).range(1..=10_000).map(|n| n as usize)
    )]
    max_results: usize,

    /// YAML file with `company` and/or `academic` keyword lists
    #[arg(short, long, value_name = "PATH")]
    keywords: Option<PathBuf>,

    /// Contact email sent with NCBI requests
    #[arg(long)]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, default_value = "get-papers-list")]
    tool: String,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// E-utilities base URL
    #[arg(long, hide = true)]
    base_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PaperFetchError>() {
                Some(PaperFetchError::EmptyResult { .. }) => eprintln!("No papers found."),
                Some(e) if e.is_transport() => eprintln!("Error: PubMed request failed: {}", e),
                _ => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = ClientConfig::new()
        .with_tool(cli.tool.as_str())
        .with_timeout(Duration::from_secs(cli.timeout));
    if let Some(email) = &cli.email {
        config = config.with_email(email.as_str());
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }

    let keywords = match &cli.keywords {
        Some(path) => KeywordSets::from_yaml_file(path)?,
        None => KeywordSets::default(),
    };

    let client = PubMedClient::with_config(config).context("Failed to create HTTP client")?;
    let fetcher = PaperFetcher::with_classifier(client, AffiliationClassifier::new(keywords));

    let rows = fetcher.run(&cli.query, cli.max_results).await?;
    sink::render(&rows, cli.file.as_deref())
        .with_context(|| match &cli.file {
            Some(path) => format!("Failed to write {}", path.display()),
            None => "Failed to print results".to_string(),
        })?;

    Ok(())
}

/// Diagnostics go to stderr; `--debug` raises this crate to `debug`
fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "warn,pubmed_paper_fetcher=debug,get_papers_list=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
