//! Hadith-Scrape main entry point
//!
//! This is the command-line interface for the Hadith-Scrape harvester.

use anyhow::Context;
use clap::Parser;
use hadith_scrape::config::{load_config_with_hash, validate, Config};
use hadith_scrape::crawler::{build_http_client, fetch_books, Pipeline};
use hadith_scrape::embedding::OpenAiBackend;
use hadith_scrape::logging::{console_filter, RunLog};
use hadith_scrape::output::print_statistics;
use std::path::{Path, PathBuf};

/// Hadith-Scrape: a hadith collection harvester
///
/// Scrapes the books and hadiths of one collection, attaches English and
/// Arabic text embeddings to every hadith, and writes one JSON file per book.
#[derive(Parser, Debug)]
#[command(name = "hadith-scrape")]
#[command(version)]
#[command(about = "Scrape a hadith collection and embed every hadith", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the collection URL from the config file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Override the output directory from the config file
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show what would be scraped without any network access
    #[arg(long, conflicts_with = "list_books")]
    dry_run: bool,

    /// Fetch the index page, list its books and exit
    #[arg(long, conflicts_with = "dry_run")]
    list_books: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(console_filter(cli.verbose, cli.quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.list_books {
        handle_list_books(&config).await?;
    } else {
        handle_scrape(&config, cli.verbose, cli.quiet).await?;
    }

    Ok(())
}

/// Loads the config file and applies command-line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if let Some(base_url) = &cli.base_url {
        config.source.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.data_dir = output_dir.to_string_lossy().into_owned();
    }
    if cli.base_url.is_some() || cli.output_dir.is_some() {
        validate(&config).context("invalid command-line override")?;
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Hadith-Scrape Dry Run ===\n");

    println!("Source:");
    println!("  Collection: {}", config.source.base_url);
    println!("  User agent: {}", config.source.user_agent);
    match config.source.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }

    println!("\nEmbedding:");
    println!("  Endpoint: {}/embeddings", config.embedding.api_base);
    println!("  Model: {}", config.embedding.model);
    println!("  Max input characters: {}", config.embedding.max_input_chars);
    println!("  Throttle: {}ms", config.embedding.throttle_ms);
    let retry = &config.embedding.retry;
    if retry.max_retries == 0 {
        println!("  Retries: unbounded");
    } else {
        println!("  Retries: {}", retry.max_retries);
    }
    println!(
        "  Retry delay: {}ms (x{}, max {}ms)",
        retry.delay_ms, retry.backoff_multiplier, retry.max_delay_ms
    );
    println!("  On first failure: {:?}", retry.on_first_failure);
    match config.embedding.resolve_api_key() {
        Ok(_) => println!("  API key: present"),
        Err(e) => println!("  API key: MISSING ({})", e),
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.data_dir);
    println!(
        "  Log: {}",
        Path::new(&config.output.data_dir)
            .join(&config.output.log_file)
            .display()
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --list-books mode: prints the collection's books
async fn handle_list_books(config: &Config) -> anyhow::Result<()> {
    let client = build_http_client(&config.source)?;
    let books = fetch_books(&client, &config.source.base_url)
        .await
        .with_context(|| format!("failed to list books of {}", config.source.base_url))?;

    for book in &books {
        println!(
            "{:>4}  {}  |  {}",
            book.book_number, book.english_name, book.arabic_name
        );
    }
    println!("\n{} books", books.len());

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let api_key = config.embedding.resolve_api_key()?;
    let backend = OpenAiBackend::new(&config.embedding, &api_key)?;

    let data_dir = Path::new(&config.output.data_dir);
    let run_log = RunLog::open(
        data_dir,
        &config.output.log_file,
        Some(console_filter(verbose, quiet)),
    )
    .with_context(|| format!("failed to open run log in {}", data_dir.display()))?;
    tracing::info!("Run log: {}", run_log.path().display());

    let mut pipeline = Pipeline::new(config, backend)?;

    let result = run_log.scope(pipeline.run()).await;
    match result {
        Ok(books) => {
            tracing::info!("Scrape completed: {} books", books.len());
            if !quiet {
                print_statistics(pipeline.stats());
            }
            Ok(())
        }
        Err(e) => {
            run_log
                .scope(async { tracing::error!("Scrape failed: {}", e) })
                .await;
            Err(e).context("scrape aborted")
        }
    }
}
