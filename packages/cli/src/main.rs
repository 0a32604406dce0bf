#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for injury report extraction.
//!
//! Uses `indicatif-log-bridge` (via [`sports_etl_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod backfill;
mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sports_etl_cli_utils::{IndicatifProgress, ProgressCallback as _};
use sports_etl_injury::{InjuryReportParser, MemoryNotifier, ParserConfig, Severity};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "sports_etl", about = "League injury report extraction tool")]
struct Cli {
    /// Parser config file (TOML). Defaults to `$INJURY_PARSER_CONFIG`, then
    /// built-in settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a report file (`.pdf`, or extracted text)
    Parse {
        /// Report file
        file: PathBuf,
        /// Output encoding
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write records here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print parsing statistics to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Download and parse the report published for one hourly slot
    Fetch {
        /// Report date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Publication hour, 0-23 Eastern
        #[arg(long)]
        hour: u32,
        /// Output encoding
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write records here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print parsing statistics to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Parse every `.txt`/`.pdf` report in a directory
    Backfill {
        /// Directory of report files
        dir: PathBuf,
        /// Where to write `<stem>.json` files (defaults to the input directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Files parsed at once
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = sports_etl_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = ParserConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse {
            file,
            format,
            output,
            stats,
        } => {
            let text = sports_etl_pdf::load_report_text(&file)?;
            parse_and_emit(config, &text, format, output.as_deref(), stats)?;
        }
        Commands::Fetch {
            date,
            hour,
            format,
            output,
            stats,
        } => {
            let client = sports_etl_pdf::download::build_client()?;
            let spinner =
                IndicatifProgress::spinner(&multi, &format!("Fetching {date} {hour:02}:00"));
            let text = sports_etl_pdf::download::fetch_report_text(&client, date, hour).await;
            spinner.finish(format!("Fetched {date} {hour:02}:00"));
            parse_and_emit(config, &text?, format, output.as_deref(), stats)?;
        }
        Commands::Backfill {
            dir,
            output_dir,
            concurrency,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| dir.clone());
            std::fs::create_dir_all(&output_dir)?;

            let inputs = backfill::collect_inputs(&dir)?;
            if inputs.is_empty() {
                log::warn!("No .txt or .pdf files in {}", dir.display());
                return Ok(());
            }

            let notifier = Arc::new(MemoryNotifier::new());
            let progress = IndicatifProgress::files_bar(&multi, "Parsing reports");

            let summary = backfill::run(
                inputs,
                &output_dir,
                Arc::new(config),
                notifier.clone(),
                concurrency,
                progress,
            )
            .await;

            let warnings = notifier
                .diagnostics()
                .into_iter()
                .filter(|d| d.severity >= Severity::Warning)
                .count();
            log::info!(
                "Backfill complete: {} file(s), {} record(s), {warnings} warning(s)",
                summary.parsed,
                summary.records
            );

            if !summary.failed.is_empty() {
                return Err(format!("{} file(s) failed to backfill", summary.failed.len()).into());
            }
        }
    }

    Ok(())
}

fn parse_and_emit(
    config: ParserConfig,
    text: &str,
    format: OutputFormat,
    output: Option<&Path>,
    stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut parser = InjuryReportParser::with_config(config)?;
    let records = parser.parse_text_content(text)?;

    let rendered = output::render(&records, format)?;
    output::write(&rendered, output)?;

    if stats {
        eprintln!("{}", serde_json::to_string_pretty(&parser.parsing_stats())?);
    }

    Ok(())
}
