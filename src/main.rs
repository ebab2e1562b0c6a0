use std::io::stderr;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use transaction_screener::{BatchEngine, PipelineConfig};

const USAGE: &str = "Usage: transaction-screener [log_level:optional] [config.toml:optional]
Available log levels: off, error, warn, info, debug, trace (default: info)";

/// Positional arguments: `[log_level] [config_path]`.
struct CliArgs {
    log_level: LevelFilter,
    config_path: Option<String>
}

impl CliArgs {
    /// Returns `None` when help was requested.
    fn parse(args: &[String]) -> Option<Self> {
        if args.iter().any(|arg| arg == "-h" || arg == "--help") {
            return None;
        }

        let log_level = match args.first() {
            Some(level) => level.parse().unwrap_or_else(|_| {
                eprintln!("Invalid log level '{level}', defaulting to 'info'");
                LevelFilter::INFO
            }),
            None => LevelFilter::INFO
        };

        Some(Self { log_level, config_path: args.get(1).cloned() })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(cli) = CliArgs::parse(&args) else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    init_tracing(cli.log_level);

    let config = match &cli.config_path {
        Some(path) => PipelineConfig::load_from_path(path)?,
        None => PipelineConfig::default()
    };

    info!("Transaction processing pipeline: {} transactions per batch", config.batch_size);

    let batch_count = BatchEngine::new(config).run().await?;

    info!("Total batches processed: {batch_count}");

    Ok(())
}

fn init_tracing(level: LevelFilter) {
    //NOTE: Partition files are the product; all diagnostics go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(stderr).with_filter(level))
        .init();
}
