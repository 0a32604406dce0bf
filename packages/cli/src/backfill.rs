//! Directory backfill: parse every report file in a directory.
//!
//! Each file gets its own parser on a blocking task, so files are parsed
//! in parallel without sharing parser state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt as _};
use sports_etl_cli_utils::ProgressCallback;
use sports_etl_injury::{InjuryReportParser, Notifier, ParseError, ParserConfig};
use sports_etl_pdf::PdfError;

use crate::output::{self, OutputError, OutputFormat};

/// Extensions picked up from the input directory.
const INPUT_EXTENSIONS: &[&str] = &["txt", "pdf"];

/// Errors for a single backfilled file.
#[derive(Debug, thiserror::Error)]
pub enum BackfillError {
    /// Reading or extracting the input failed.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Parser construction or parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Writing the output failed.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// The blocking task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(String),
}

/// Outcome of a backfill run.
#[derive(Debug, Default)]
pub struct BackfillSummary {
    /// Files parsed successfully.
    pub parsed: usize,
    /// Records written across all files.
    pub records: usize,
    /// Files that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Lists the `.txt` and `.pdf` files directly inside `dir`, sorted by
/// name.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be read.
pub fn collect_inputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                INPUT_EXTENSIONS
                    .iter()
                    .any(|ext| e.eq_ignore_ascii_case(ext))
            });
        if matches && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// `<output_dir>/<stem>.json` for `input`.
#[must_use]
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "report".into(), |s| s.to_string_lossy());
    output_dir.join(format!("{stem}.json"))
}

/// Parses every file in `inputs`, at most `concurrency` at a time, and
/// writes one JSON file per input into `output_dir`.
pub async fn run(
    inputs: Vec<PathBuf>,
    output_dir: &Path,
    config: Arc<ParserConfig>,
    notifier: Arc<dyn Notifier>,
    concurrency: usize,
    progress: Arc<dyn ProgressCallback>,
) -> BackfillSummary {
    log::info!(
        "Backfilling {} file(s) into {} (concurrency={concurrency})",
        inputs.len(),
        output_dir.display()
    );
    progress.set_total(inputs.len() as u64);

    let results: Vec<_> = stream::iter(inputs.into_iter().map(|input| {
        let destination = output_path(&input, output_dir);
        let config = config.clone();
        let notifier = notifier.clone();
        let progress = progress.clone();
        async move {
            let task_input = input.clone();
            let result = tokio::task::spawn_blocking(move || {
                parse_file(&task_input, &destination, &config, notifier)
            })
            .await
            .map_err(|e| BackfillError::Task(e.to_string()))
            .and_then(|r| r);
            if let Some(name) = input.file_name() {
                progress.set_message(name.to_string_lossy().into_owned());
            }
            progress.inc(1);
            (input, result)
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect()
    .await;

    let mut summary = BackfillSummary::default();
    for (input, result) in results {
        match result {
            Ok(count) => {
                summary.parsed += 1;
                summary.records += count;
            }
            Err(e) => {
                log::error!("Failed to backfill {}: {e}", input.display());
                summary.failed.push((input, e.to_string()));
            }
        }
    }
    summary.failed.sort();

    progress.finish(format!(
        "Parsed {} file(s), {} record(s), {} failure(s)",
        summary.parsed,
        summary.records,
        summary.failed.len()
    ));

    summary
}

fn parse_file(
    input: &Path,
    destination: &Path,
    config: &ParserConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<usize, BackfillError> {
    let text = sports_etl_pdf::load_report_text(input)?;
    let mut parser = InjuryReportParser::with_config(config.clone())?.with_notifier(notifier);
    let records = parser.parse_text_content(&text)?;

    let rendered = output::render(&records, OutputFormat::Json)?;
    output::write(&rendered, Some(destination))?;

    log::debug!("{}: {} record(s)", input.display(), records.len());
    Ok(records.len())
}
