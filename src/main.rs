mod ai;
mod annotation;
mod config;
mod error;
mod feed;
mod models;
mod runner;

use config::Config;
use error::{AppError, Result};
use runner::BatchRunner;

const USAGE: &str = "Usage: feed-annotator [--dry-run] [--limit N]

Adds a summary and a translation to unread Miniflux entries.

Options:
  --dry-run   Generate and compose annotations without writing them back
  --limit N   Process at most N entries this run (overrides MAX_ENTRIES)
  --help      Show this message

Environment:
  MINIFLUX_URL, MINIFLUX_API_KEY, OPENAI_MODEL (required)
  CATEGORY_ID (default 4), MAX_ENTRIES (default 1)
  OPENAI_API_KEY, OPENAI_BASE_URL";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    dry_run: bool,
    limit: Option<usize>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dry-run" => parsed.dry_run = true,
            "--help" | "-h" => parsed.help = true,
            "--limit" => {
                let value = iter
                    .next()
                    .ok_or_else(|| AppError::Config("--limit requires a value".to_string()))?;
                let limit = value.parse().map_err(|_| {
                    AppError::Config(format!("--limit must be a positive integer, got {:?}", value))
                })?;
                parsed.limit = Some(limit);
            }
            other => {
                return Err(AppError::Config(format!("unknown argument {:?}", other)));
            }
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (info by default, RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", USAGE);
            return Ok(());
        }
    };

    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    // Configuration problems end the run before any network call
    let job = match Config::load().and_then(|mut config| {
        if let Some(limit) = args.limit {
            config.max_entries = limit;
        }
        config.validate()
    }) {
        Ok(job) => job,
        Err(e) => {
            tracing::error!("Error: {}", e);
            return Ok(());
        }
    };

    let runner = BatchRunner::new(&job)?.with_dry_run(args.dry_run);
    let report = match runner.run().await {
        Ok(report) => report,
        Err(e) => {
            if e.is_transport() {
                tracing::error!("Failed to fetch unread entries: {}", e);
            }
            return Err(e);
        }
    };

    if report.has_write_failures() {
        return Err(anyhow::anyhow!(
            "{} of {} entries failed to write back",
            report.write_failures(),
            report.processed()
        )
        .into());
    }

    Ok(())
}
