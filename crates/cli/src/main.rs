// ABOUTME: CLI for the MobileBurd scraper: fetch or parse the index and trip reports, print JSON.
// ABOUTME: Also exposes the URL rewriter and the photo passthrough target for scripting.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use mobileburd::{Category, Client, ScrapeError};
use serde::Serialize;

/// How many report pages to fetch at once.
const REPORT_CONCURRENCY: usize = 4;

/// Fetch Bob Burd's trip reports and print them as structured JSON.
#[derive(Parser, Debug)]
#[command(name = "mobileburd")]
#[command(about = "Scrape the trip report site into structured JSON", long_about = None)]
struct Args {
    /// Origin of the trip report site (scheme and host).
    #[arg(long, global = true, default_value = mobileburd::options::DEFAULT_ORIGIN)]
    origin: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Output compact JSON instead of pretty.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the front page headers and grouped report listing.
    Index {
        /// Parse a saved front page instead of fetching. Use "-" for stdin.
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Print one or more trip reports.
    Report {
        /// Report filenames as listed on the front page, e.g. tower_peak_1.html.
        #[arg(required_unless_present = "html")]
        files: Vec<String>,

        /// Parse a saved report page instead of fetching. Use "-" for stdin.
        #[arg(long, conflicts_with = "files")]
        html: Option<PathBuf>,
    },
    /// Rewrite a scraped href to its absolute URL.
    Rewrite {
        href: String,
        /// One of: photo, person, peak, map, profile, gpx.
        category: String,
    },
    /// Print the redirect target for a trip photo path.
    Photo { path: String },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn read_html(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("error reading file {:?}", path))
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}

/// Message for a failure, worded by what went wrong.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ScrapeError>() {
        Some(e) if e.is_upstream_unavailable() => {
            format!("could not reach the trip report site: {}", e)
        }
        Some(e) if e.is_malformed() => {
            format!("the page no longer looks the way the scraper expects: {}", e)
        }
        Some(e) => e.to_string(),
        None => format!("{:#}", err),
    }
}

async fn run(args: Args) -> Result<()> {
    let client = Client::builder()
        .origin(&args.origin)
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    match args.command {
        Command::Index { html } => {
            let page = match html {
                Some(path) => {
                    let source = read_html(&path)?;
                    client.parse_index_html(&source, &client.site().index_url)?
                }
                None => client.index().await?,
            };
            print_json(&page, args.compact)
        }
        Command::Report { files, html } => {
            if let Some(path) = html {
                let source = read_html(&path)?;
                let url = path.display().to_string();
                let report = client.parse_report_html(&source, &url)?;
                return print_json(&report, args.compact);
            }

            let results: Vec<_> = stream::iter(files.iter())
                .map(|file| client.report(file))
                .buffered(REPORT_CONCURRENCY)
                .collect()
                .await;
            let reports = results.into_iter().collect::<Result<Vec<_>, _>>()?;
            tracing::info!(count = reports.len(), "fetched reports");

            if reports.len() == 1 {
                print_json(&reports[0], args.compact)
            } else {
                print_json(&reports, args.compact)
            }
        }
        Command::Rewrite { href, category } => {
            let category: Category = category.parse()?;
            println!("{}", client.rewrite(&href, category));
            Ok(())
        }
        Command::Photo { path } => {
            println!("{}", client.photo_redirect(&path));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", describe(&err));
            ExitCode::from(1)
        }
    }
}
