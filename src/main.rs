//! Listing-Lens main entry point
//!
//! This is the command-line interface for the Listing-Lens commerce-fact
//! extractor.

use clap::{Parser, Subcommand, ValueEnum};
use listing_lens::config::{load_config_with_hash, Config};
use listing_lens::facts::ListingFactsAssembler;
use listing_lens::identifier::{detail_url, ProductIdentifier};
use listing_lens::listing::{group_page, NodeKind};
use listing_lens::output::{format_groups, format_record, format_unavailable};
use listing_lens::{HttpDocumentProvider, LensError, ListingRecord, ProductDocument};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Listing-Lens: commerce facts from retail product pages
///
/// Listing-Lens extracts brand, sales rank, fulfillment breakdown and stock
/// from marketplace detail pages, and groups the products of a listing page
/// into main products and variations.
#[derive(Parser, Debug)]
#[command(name = "listing-lens")]
#[command(version)]
#[command(about = "Commerce facts from retail product pages", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and extract the listing record of each identifier
    Facts {
        /// Product identifiers (ASINs)
        #[arg(value_name = "ASIN", required = true)]
        asins: Vec<String>,

        /// Saved detail page to use instead of fetching `--current-asin`
        #[arg(long, value_name = "HTML", requires = "current_asin")]
        current_page: Option<PathBuf>,

        /// Identifier of the page given with `--current-page`
        #[arg(long, value_name = "ASIN", requires = "current_page")]
        current_asin: Option<String>,
    },

    /// Group the product nodes of a saved listing page
    Page {
        /// Saved listing or detail page
        #[arg(value_name = "HTML")]
        html: PathBuf,

        /// URL the page was saved from
        #[arg(long)]
        url: Option<Url>,

        /// Also fetch the listing record of every main product
        #[arg(long)]
        facts: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Facts {
            asins,
            current_page,
            current_asin,
        } => {
            let asins = parse_identifiers(&asins)?;
            let current = match (current_asin, current_page) {
                (Some(asin), Some(path)) => Some((ProductIdentifier::parse(&asin)?, read_page(&path)?)),
                _ => None,
            };
            handle_facts(&config, &asins, current, cli.format).await?;
        }
        Command::Page { html, url, facts } => {
            handle_page(&config, &html, url.as_ref(), facts, cli.format).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_lens=info,warn"),
            1 => EnvFilter::new("listing_lens=debug,info"),
            2 => EnvFilter::new("listing_lens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_identifiers(raw: &[String]) -> Result<Vec<ProductIdentifier>, LensError> {
    raw.iter()
        .map(|asin| ProductIdentifier::parse(asin).map_err(LensError::from))
        .collect()
}

fn read_page(path: &Path) -> Result<ProductDocument, LensError> {
    let html = std::fs::read_to_string(path)?;
    Ok(ProductDocument::parse(&html))
}

fn base_url(config: &Config) -> Result<Url, LensError> {
    Url::parse(&config.marketplace.base_url).map_err(|e| {
        listing_lens::ConfigError::InvalidUrl(format!("{}: {e}", config.marketplace.base_url)).into()
    })
}

/// Handles the facts command: fetches one record per identifier
async fn handle_facts(
    config: &Config,
    asins: &[ProductIdentifier],
    current: Option<(ProductIdentifier, ProductDocument)>,
    format: OutputFormat,
) -> Result<(), LensError> {
    let mut provider = HttpDocumentProvider::new(&config.marketplace, &config.fetcher)?;
    if let Some((asin, document)) = current {
        tracing::info!("Using saved page for {}", asin);
        provider.set_current(asin, document);
    }

    let assembler = ListingFactsAssembler::from_config(provider, &config.fetcher);
    let records = assembler.fetch_many(asins).await;

    let fetched = records.iter().filter(|r| r.is_some()).count();
    tracing::info!("Fetched {} of {} listing records", fetched, asins.len());

    print_records(config, asins, &records, format)
}

/// Handles the page command: groups the page's product nodes
async fn handle_page(
    config: &Config,
    path: &Path,
    page_url: Option<&Url>,
    with_facts: bool,
    format: OutputFormat,
) -> Result<(), LensError> {
    let base = base_url(config)?;
    let doc = read_page(path)?;
    let groups = group_page(&doc, page_url, &base, &config.grouping);
    tracing::info!(
        "Found {} groups ({} main)",
        groups.len(),
        groups.iter().filter(|g| g.kind == NodeKind::Main).count()
    );

    if !with_facts {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
            OutputFormat::Text => print!("{}", format_groups(&groups)),
        }
        return Ok(());
    }

    let mains: Vec<ProductIdentifier> = groups
        .iter()
        .filter(|g| g.kind == NodeKind::Main)
        .map(|g| g.asin.clone())
        .collect();

    // A detail page is its own main product's document
    let mut provider = HttpDocumentProvider::new(&config.marketplace, &config.fetcher)?;
    if let Some(asin) = page_url.and_then(|url| listing_lens::identifier::from_url_path(url.path())) {
        provider.set_current(asin, doc.clone());
    }

    let assembler = ListingFactsAssembler::from_config(provider, &config.fetcher);
    let records = assembler.fetch_many(&mains).await;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "groups": groups, "records": records });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        OutputFormat::Text => {
            print!("{}", format_groups(&groups));
            println!();
            print_records(config, &mains, &records, format)
        }
    }
}

fn print_records(
    config: &Config,
    asins: &[ProductIdentifier],
    records: &[Option<ListingRecord>],
    format: OutputFormat,
) -> Result<(), LensError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Text => {
            let base = base_url(config)?;
            for (asin, record) in asins.iter().zip(records) {
                match record {
                    Some(record) => {
                        let details = detail_url(&base, asin).ok();
                        println!("{}", format_record(record, details.as_ref()));
                    }
                    None => println!("{}", format_unavailable(asin.as_str())),
                }
            }
        }
    }
    Ok(())
}
