//! Command-line interface for MagangHub.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use maganghub_core::cache::TtlCache;
use maganghub_core::catalog::{Catalog, ListingQuery, CATALOG_PAGE_SIZE};
use maganghub_core::collect::collect_vacancies;
use maganghub_core::snapshot::{read_snapshot, write_snapshot};
use maganghub_core::{Aggregator, ApiClient, ClientConfig, Enricher, PageFailure, Result, StatusLookup};

use crate::output::{format_listing, format_status_row};

pub const DEFAULT_SNAPSHOT_PATH: &str = "data/posisi.csv";

/// MagangHub - internship listings, acceptance odds and application status.
#[derive(Parser)]
#[command(name = "maganghub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `MAGANGHUB_*` environment configuration.
#[derive(Args, Debug, Default)]
pub struct ApiArgs {
    /// Base URL of the listing API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// API token, sent as a bearer token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Maximum number of page requests in flight
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,
}

impl ApiArgs {
    /// Environment configuration with command-line overrides applied.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.api_token = Some(token.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect every active vacancy into a snapshot CSV.
    Collect {
        /// Snapshot file to write
        #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
        output: PathBuf,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Show the status of every application made with an email address.
    Status {
        /// Email address used to register
        email: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the snapshot, filtered and paged.
    Browse(BrowseArgs),
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Snapshot file to read
    #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
    pub snapshot: PathBuf,

    /// Only positions open to this program of study
    #[arg(long)]
    pub program: Option<String>,

    /// Province filter (repeatable)
    #[arg(long = "province")]
    pub provinces: Vec<String>,

    /// Regency/city filter (repeatable)
    #[arg(long = "district")]
    pub districts: Vec<String>,

    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Refresh the shown page with live counters
    #[arg(long)]
    pub live: bool,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

impl BrowseArgs {
    fn query(&self) -> ListingQuery {
        ListingQuery {
            program: self.program.clone(),
            provinces: self.provinces.clone(),
            districts: self.districts.clone(),
            page: self.page,
        }
    }
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    run_with(Cli::parse()).await
}

/// Run an already parsed command line.
pub async fn run_with(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Collect { output, max_pages } => {
            collect_command(&cli.api, &output, max_pages).await
        }
        Commands::Status { email, json } => status_command(&cli.api, &email, json).await,
        Commands::Browse(args) => browse_command(&cli.api, &args).await,
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

async fn collect_command(api: &ApiArgs, output: &Path, max_pages: Option<u32>) -> Result<()> {
    let mut config = api.client_config()?;
    if let Some(max_pages) = max_pages {
        config.max_pages = max_pages;
        config.validate()?;
    }

    println!(
        "{} {}",
        style("Collecting").bold(),
        style(config.vacancies_url()).cyan()
    );

    let aggregator = Aggregator::from_config(Arc::new(ApiClient::new(&config)?), &config);

    let pb = spinner("Fetching vacancy pages...");
    let result = collect_vacancies(&aggregator, &config).await;
    pb.finish_and_clear();
    let report = result?;
    info!(
        rows = report.records.len(),
        skipped = report.skipped,
        failed_pages = report.failed_pages.len(),
        "collection finished"
    );

    if report.is_empty() {
        print_failed_pages(&report.failed_pages);
        println!("{}", style("No data found.").yellow());
        return Ok(());
    }

    write_snapshot(output, &report.records)?;

    println!("  Rows: {}", style(report.records.len()).green());
    if report.skipped > 0 {
        println!("  Skipped items: {}", style(report.skipped).yellow());
    }
    print_failed_pages(&report.failed_pages);
    if report.truncated {
        println!(
            "  {}",
            style(format!("Stopped at the {} page cap", config.max_pages)).yellow()
        );
    }

    println!();
    println!("{} {}", style("Saved to:").green().bold(), output.display());
    Ok(())
}

fn print_failed_pages(failed: &[PageFailure]) {
    if failed.is_empty() {
        return;
    }
    let pages: Vec<String> = failed.iter().map(|f| f.page.to_string()).collect();
    println!("  Failed pages: {}", style(pages.join(", ")).yellow().bold());
}

async fn status_command(api: &ApiArgs, email: &str, json: bool) -> Result<()> {
    let config = api.client_config()?;
    let aggregator = Aggregator::from_config(Arc::new(ApiClient::new(&config)?), &config);
    let lookup = StatusLookup::new(aggregator, &config, Arc::new(TtlCache::new(config.cache_ttl)));

    let pb = spinner("Looking up applications...");
    let result = lookup.lookup_status(email).await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_not_found() => {
            info!(error = %e, "no participant data");
            println!(
                "{}",
                style(format!("No application data found for {}.", email.trim())).yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for row in &report.rows {
        println!("{}", format_status_row(row));
        println!();
    }
    if report.failed_roster_pages > 0 {
        warn!(failed = report.failed_roster_pages, "status report built from partial rosters");
        println!(
            "{}",
            style(format!(
                "{} roster page(s) could not be loaded; counts may be low.",
                report.failed_roster_pages
            ))
            .yellow()
        );
    }
    if !report.sorted_by_date {
        println!(
            "{}",
            style("Some application dates could not be read; rows are unsorted.").dim()
        );
    }
    Ok(())
}

async fn browse_command(api: &ApiArgs, args: &BrowseArgs) -> Result<()> {
    let catalog = Catalog::new(read_snapshot(&args.snapshot)?);
    let mut page = catalog.query(&args.query(), CATALOG_PAGE_SIZE);

    if args.live && !page.records.is_empty() {
        let config = api.client_config()?;
        let enricher = Enricher::new(
            Arc::new(ApiClient::new(&config)?),
            Arc::new(TtlCache::new(config.cache_ttl)),
        );
        let pb = spinner("Refreshing live counters...");
        page.records = enricher.enrich(page.records).await;
        pb.finish_and_clear();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.records.is_empty() {
        println!("{}", style("No vacancies match the selected filters.").yellow());
        return Ok(());
    }

    println!(
        "{} {}/{} ({} vacancies)",
        style("Page").bold(),
        page.page,
        page.total_pages,
        page.total_rows
    );
    println!();
    for record in &page.records {
        println!("{}", format_listing(record));
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_collect_defaults() {
        let cli = Cli::parse_from(["maganghub", "collect"]);

        let Commands::Collect { output, max_pages } = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(output, PathBuf::from(DEFAULT_SNAPSHOT_PATH));
        assert!(max_pages.is_none());
        assert!(cli.api.api_url.is_none());
    }

    #[test]
    fn test_cli_parse_status_with_global_overrides() {
        let cli = Cli::parse_from([
            "maganghub",
            "status",
            "budi@example.com",
            "--api-url",
            "http://localhost:9000",
            "--concurrency",
            "2",
        ]);

        let Commands::Status { email, json } = cli.command else {
            panic!("expected status");
        };
        assert_eq!(email, "budi@example.com");
        assert!(!json);
        assert_eq!(cli.api.api_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.api.concurrency, Some(2));
    }

    #[test]
    fn test_cli_parse_browse_repeated_filters() {
        let cli = Cli::parse_from([
            "maganghub",
            "browse",
            "--program",
            "Informatika",
            "--province",
            "BALI",
            "--province",
            "JAWA BARAT",
            "--page",
            "3",
            "--live",
        ]);

        let Commands::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        let query = args.query();
        assert_eq!(query.program.as_deref(), Some("Informatika"));
        assert_eq!(query.provinces, vec!["BALI", "JAWA BARAT"]);
        assert!(query.districts.is_empty());
        assert_eq!(query.page, 3);
        assert!(args.live);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let api = ApiArgs {
            concurrency: Some(0),
            ..ApiArgs::default()
        };
        assert!(api.client_config().is_err());
    }
}
