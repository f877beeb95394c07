//! concentra: decentralization metrics for blockchain networks.
//!
//! Loads one JSON snapshot per network, evaluates producer concentration over
//! trailing windows and wealth concentration over the rich list, and writes
//! markdown reports or a JSON document.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use concentra_core::config::StatsConfig;
use concentra_core::traits::{AliasResolver, Loader, NoAliases};
use concentra_ingest::{AliasTable, SnapshotLoader};
use concentra_metrics::{NetworkStats, NetworkSummary, RecordStore};
use concentra_report::{MarkdownWriter, write_network_report, write_summary_table};

use crate::config::{OutputFormat, RunConfig, WindowSpec, parse_window_spec, slug};

/// How many producers or accounts it takes to control a network.
#[derive(Parser, Debug)]
#[command(name = "concentra", version)]
#[command(about = "Decentralization metrics for blockchain networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate snapshots and write per-network reports.
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Network snapshot file (repeatable).
    #[arg(short, long = "snapshot", required = true)]
    snapshots: Vec<PathBuf>,

    /// Exclusive end of every window (RFC 3339). Defaults to just past each
    /// snapshot's latest block.
    #[arg(long)]
    end: Option<DateTime<Utc>>,

    /// Window as NAME=DURATION, e.g. "1 day=1d" (repeatable). Defaults to
    /// 1 day and 1 week.
    #[arg(short, long = "window", value_parser = parse_window_spec)]
    windows: Vec<WindowSpec>,

    /// Fraction of blocks or wealth considered a takeover.
    #[arg(short, long, default_value_t = concentra_core::constants::DEFAULT_PERCENT_TO_TAKE_OVER)]
    threshold: f64,

    /// JSON object mapping ids to display names.
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// Directory for markdown reports.
    #[arg(short, long, default_value = "results")]
    output_dir: PathBuf,

    /// Output format ("markdown" or "json").
    #[arg(long, default_value = "markdown")]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,
}

impl ReportArgs {
    fn into_config(self) -> RunConfig {
        let defaults = RunConfig::default();
        RunConfig {
            snapshots: self.snapshots,
            end: self.end,
            windows: if self.windows.is_empty() {
                defaults.windows
            } else {
                self.windows
            },
            threshold: self.threshold,
            aliases: self.aliases,
            output_dir: self.output_dir,
            format: self.format,
            log_level: self.log_level,
            log_format: self.log_format,
        }
    }
}

/// One evaluated network, kept until every report is written.
struct Evaluated {
    source: String,
    store: RecordStore,
    stats: NetworkStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => {
            let config = args.into_config();
            init_logging(&config.log_level, &config.log_format);
            run_report(&config)
        }
    }
}

fn run_report(config: &RunConfig) -> Result<()> {
    info!(
        "concentra v{}: {} snapshot(s), {} window(s), threshold {}",
        env!("CARGO_PKG_VERSION"),
        config.snapshots.len(),
        config.windows.len(),
        config.threshold
    );

    let aliases: Box<dyn AliasResolver> = match &config.aliases {
        Some(path) => Box::new(
            AliasTable::read(path)
                .with_context(|| format!("Failed to read alias table {}", path.display()))?,
        ),
        None => Box::new(NoAliases),
    };

    let mut evaluated = Vec::with_capacity(config.snapshots.len());
    for path in &config.snapshots {
        evaluated.push(
            evaluate_snapshot(path, config)
                .with_context(|| format!("Failed to evaluate {}", path.display()))?,
        );
    }

    match config.format {
        OutputFormat::Markdown => write_markdown(config, &evaluated, aliases.as_ref()),
        OutputFormat::Json => {
            let stats: Vec<&NetworkStats> = evaluated.iter().map(|e| &e.stats).collect();
            let json = serde_json::to_string_pretty(&stats).context("Failed to encode stats")?;
            println!("{json}");
            Ok(())
        }
    }
}

fn evaluate_snapshot(path: &Path, config: &RunConfig) -> Result<Evaluated> {
    let mut loader = SnapshotLoader::open(path)?;
    let end = match (config.end, loader.latest_block_time()) {
        (Some(end), _) => end,
        // Just past the latest block so it falls inside [start, end).
        (None, Some(latest)) => latest + Duration::seconds(1),
        (None, None) => {
            warn!(path = %path.display(), "snapshot has no blocks; anchoring windows at now");
            Utc::now()
        }
    };

    let stats_config = StatsConfig::new(
        loader.network_name(),
        end - config.lookback(),
        end,
        config.threshold,
    )?;
    let windows = config
        .windows
        .iter()
        .map(|spec| spec.anchored(end))
        .collect::<Result<Vec<_>, _>>()?;

    let source = loader.source();
    let store = RecordStore::load(stats_config, &mut loader)?;
    let stats = store.network_stats(&windows);
    Ok(Evaluated {
        source,
        store,
        stats,
    })
}

fn write_markdown(
    config: &RunConfig,
    evaluated: &[Evaluated],
    aliases: &dyn AliasResolver,
) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create directory: {}", config.output_dir.display())
    })?;
    let generated_at = Utc::now();

    let mut summaries: Vec<NetworkSummary> = Vec::with_capacity(evaluated.len());
    for e in evaluated {
        let name = &e.stats.summary.name;
        let file_stem = slug(name);
        if file_stem.is_empty() {
            bail!("network name {name:?} has no usable characters for a file name");
        }
        let path = config.output_dir.join(format!("{file_stem}.results.md"));
        let mut writer = MarkdownWriter::create(&path)?;
        write_network_report(&mut writer, &e.store, &e.stats, aliases, &e.source, generated_at)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        writer.finish()?;
        info!(network = %name, path = %path.display(), "report written");
        summaries.push(e.stats.summary.clone());
    }

    let path = config.output_dir.join("summary.md");
    let mut writer = MarkdownWriter::create(&path)?;
    write_summary_table(&mut writer, &summaries, generated_at)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.finish()?;
    info!(path = %path.display(), networks = summaries.len(), "summary written");
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so JSON results on stdout stay machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
