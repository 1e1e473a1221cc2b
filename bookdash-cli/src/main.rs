//! BookDash CLI - book search engine dashboard

mod dashboard;
mod display;

use anyhow::Result;
use bookdash::config::Config;
use bookdash::render::{format_text, render};
use bookdash::{
    evaluate, reindex, Action, ActionReport, BoostMode, HttpTransport, SearchRequest, Searcher,
    SystemRunner,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bookdash")]
#[command(
    author,
    version,
    about = "BookDash - Re-index, search and evaluate a hosted book index"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ~/.config/bookdash/config.yaml)
    #[arg(long, short = 'c', env = "BOOKDASH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Search engine base URL
    #[arg(long, env = "BOOKDASH_URL", global = true)]
    url: Option<String>,

    /// Index holding the book documents
    #[arg(long, env = "BOOKDASH_INDEX", global = true)]
    index: Option<String>,

    /// How text relevance and rating are combined (multiply, sum, avg, max, min, replace)
    #[arg(long, env = "BOOKDASH_BOOST_MODE", global = true)]
    boost_mode: Option<String>,

    /// Directory the indexing and evaluation scripts run in
    #[arg(long, env = "BOOKDASH_SCRIPTS_DIR", global = true)]
    scripts_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the book index
    Search {
        /// Search query
        query: String,

        /// Page number (1-indexed)
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        /// Results per page (default from config)
        #[arg(long, short = 'n')]
        size: Option<u32>,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Print the request body for a search without sending it
    Query {
        /// Search query
        query: String,

        /// Page number (1-indexed)
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        /// Results per page (default from config)
        #[arg(long, short = 'n')]
        size: Option<u32>,
    },

    /// Re-index the book dataset with the indexing script
    Reindex {
        /// Data file passed to the indexing script (default from config)
        #[arg(long)]
        data: Option<String>,
    },

    /// Run the evaluation script
    Evaluate,

    /// Show the effective configuration
    Config,

    /// Interactive dashboard (default)
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Search {
            query,
            page,
            size,
            format,
        } => cmd_search(&config, &query, page, size, &format).await,
        Commands::Query { query, page, size } => cmd_query(&config, &query, page, size),
        Commands::Reindex { data } => cmd_reindex(config, data).await,
        Commands::Evaluate => cmd_evaluate(&config).await,
        Commands::Config => cmd_config(&config),
        Commands::Dashboard => cmd_dashboard(&config).await,
    }
}

/// Config file overlaid with command-line and environment overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(ref url) = cli.url {
        config.engine.url = url.clone();
    }
    if let Some(ref index) = cli.index {
        config.engine.index = index.clone();
    }
    if let Some(ref mode) = cli.boost_mode {
        config.search.boost_mode = mode.parse::<BoostMode>()?;
    }
    if let Some(ref dir) = cli.scripts_dir {
        config.scripts.working_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn build_request(config: &Config, query: &str, page: u32, size: Option<u32>) -> Result<SearchRequest> {
    let size = size.unwrap_or(config.search.page_size);
    Ok(SearchRequest::new(query, &config.engine.index, size, page)?)
}

async fn cmd_search(
    config: &Config,
    query: &str,
    page: u32,
    size: Option<u32>,
    format: &str,
) -> Result<()> {
    let request = build_request(config, query, page, size)?;
    let searcher = Searcher::new(HttpTransport::new(&config.engine.url), config.query_builder());

    let result = searcher.search(&request).await.map_err(|e| {
        anyhow::anyhow!("Search against {} failed: {}", config.engine.url, e)
    })?;
    let rendering = render(&result);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&rendering)?);
    } else {
        print!("{}", format_text(&rendering));
    }
    Ok(())
}

fn cmd_query(config: &Config, query: &str, page: u32, size: Option<u32>) -> Result<()> {
    let request = build_request(config, query, page, size)?;
    let body = config.query_builder().body(&request);

    println!("POST {}/{}/_search", config.engine.url.trim_end_matches('/'), request.target_index);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn cmd_reindex(mut config: Config, data: Option<String>) -> Result<()> {
    if let Some(data) = data {
        config.scripts.data_file = data;
    }

    println!("{}", display::action_banner(Action::Reindex));
    let report = reindex(&SystemRunner, &config.scripts).await?;
    finish_report(&report)
}

async fn cmd_evaluate(config: &Config) -> Result<()> {
    println!("{}", display::action_banner(Action::Evaluate));
    let report = evaluate(&SystemRunner, &config.scripts).await?;
    finish_report(&report)
}

/// Print a script report; a failed script fails the command
fn finish_report(report: &ActionReport) -> Result<()> {
    print!("{}", display::format_report(report));
    if !report.success {
        anyhow::bail!("{}", report.message());
    }
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}

async fn cmd_dashboard(config: &Config) -> Result<()> {
    let searcher = Searcher::new(HttpTransport::new(&config.engine.url), config.query_builder());
    let dashboard = dashboard::Dashboard::new(config, searcher, SystemRunner);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();
    dashboard.run(&mut input, &mut output).await
}
