#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Injury report parser.
//!
//! Turns the plain text of a league injury report (as produced by a
//! PDF-to-text step) into structured [`PlayerRecord`]s. The pipeline:
//!
//! 1. **Reject** inputs that are too short to be a report.
//! 2. **Truncate** at a `=== PARSED RECORDS` marker left by earlier runs.
//! 3. **Merge** injury entries the layout wrapped over several lines
//!    (see [`merge`]).
//! 4. **Segment** the lines into game sections (see [`sections`]).
//! 5. **Extract** one record per player line, recovering and scoring the
//!    reason text (see [`reason`] and [`scoring`]).
//! 6. **Report** the outcome through a [`Notifier`].
//!
//! Every parse call resets the parser's statistics, so one instance can be
//! reused for many reports, but not concurrently. Give each thread its own
//! parser.

pub mod config;
pub mod detect;
pub mod extract;
pub mod merge;
pub mod notify;
pub mod reason;
pub mod scoring;
pub mod sections;
pub mod tables;

use std::sync::Arc;

use serde_json::{Value, json};

pub use config::{CONFIG_ENV_VAR, ParserConfig, TruncationFixConfig};
pub use notify::{
    Diagnostic, MemoryNotifier, Notifier, NotifyError, NullNotifier, Severity, null_notifier,
};
pub use sports_etl_injury_models::{
    ConfidenceDistribution, InjuryStatus, ParsingStats, ParsingStatsReport, PlayerRecord,
    UNKNOWN_TEAM,
};

use extract::{ExtractionTally, extract_section};
use merge::MergeOutput;
use notify::{Details, dispatch};
use sections::{GameSection, identify_game_sections};
use tables::Vocabulary;

type MergeStage = fn(&str, &Vocabulary) -> Result<MergeOutput, ParseError>;

type ExtractStage = fn(
    &[&str],
    &[GameSection],
    &Vocabulary,
    usize,
    &mut ExtractionTally,
) -> Result<Vec<PlayerRecord>, ParseError>;

/// The fallible pipeline stages.
#[derive(Clone, Copy)]
struct Stages {
    merge: MergeStage,
    extract: ExtractStage,
}

const STAGES: Stages = Stages {
    merge: merge::merge_multiline_injuries,
    extract: extract_sections,
};

fn extract_sections(
    lines: &[&str],
    sections: &[GameSection],
    vocab: &Vocabulary,
    max_samples: usize,
    tally: &mut ExtractionTally,
) -> Result<Vec<PlayerRecord>, ParseError> {
    let mut records = Vec::new();
    for section in sections {
        records.extend(extract_section(lines, section, vocab, max_samples, tally)?);
    }
    Ok(records)
}

/// Marker appended by earlier tooling; everything after it is ignored.
pub const PARSED_RECORDS_MARKER: &str = "=== PARSED RECORDS";

/// Errors that can occur while configuring or running the parser.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A configured regex failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A config document could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// A config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The multi-line merge pass hit a line it could not split.
    #[error("Merge failed on '{line}': {message}")]
    Merge {
        /// Offending line.
        line: String,
        /// What went wrong.
        message: String,
    },

    /// Record extraction hit a line it could not slice.
    #[error("Extraction failed on '{line}': {message}")]
    Extraction {
        /// Offending line.
        line: String,
        /// What went wrong.
        message: String,
    },
}

impl ParseError {
    /// Short machine-readable name of the error variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPattern(_) => "invalid_pattern",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Merge { .. } => "merge",
            Self::Extraction { .. } => "extraction",
        }
    }
}

/// How a successful parse call turned out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseOutcome {
    /// No records at all.
    NoRecords,
    /// Too many records scored below the low-confidence threshold.
    LowConfidence {
        /// Records below the threshold.
        low: usize,
        /// All records.
        total: usize,
        /// `low / total`.
        ratio: f64,
    },
    /// Records found with acceptable confidence.
    Parsed {
        /// All records.
        total: usize,
    },
}

impl ParseOutcome {
    /// Classifies a set of records against `config`'s thresholds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn assess(records: &[PlayerRecord], config: &ParserConfig) -> Self {
        if records.is_empty() {
            return Self::NoRecords;
        }

        let total = records.len();
        let low = records
            .iter()
            .filter(|r| r.confidence < config.low_confidence_threshold)
            .count();
        let ratio = low as f64 / total as f64;

        if ratio > config.low_confidence_ratio {
            Self::LowConfidence { low, total, ratio }
        } else {
            Self::Parsed { total }
        }
    }
}

/// Parses injury report text into player records.
///
/// ```
/// use sports_etl_injury::InjuryReportParser;
///
/// let mut parser = InjuryReportParser::new();
/// let records = parser.parse_text_content("too short").unwrap();
/// assert!(records.is_empty());
/// ```
pub struct InjuryReportParser {
    config: ParserConfig,
    vocab: Vocabulary,
    notifier: Arc<dyn Notifier>,
    stats: ParsingStats,
    unparsed_lines: Vec<String>,
}

impl Default for InjuryReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InjuryReportParser {
    /// Creates a parser with the default config and no notifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            vocab: Vocabulary::default(),
            notifier: null_notifier(),
            stats: ParsingStats::default(),
            unparsed_lines: Vec::new(),
        }
    }

    /// Creates a parser with a custom config.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidPattern`] if a configured truncation
    /// fix is not a valid regex.
    pub fn with_config(config: ParserConfig) -> Result<Self, ParseError> {
        let vocab = Vocabulary::new(&config)?;
        Ok(Self {
            config,
            vocab,
            notifier: null_notifier(),
            stats: ParsingStats::default(),
            unparsed_lines: Vec::new(),
        })
    }

    /// Replaces the diagnostics notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The active config.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one report.
    ///
    /// Inputs shorter than the configured minimum are rejected with a
    /// warning and yield no records. Only genuine failures return `Err`;
    /// a report with no recognizable players is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Extraction`] if a player line cannot be
    /// sliced at its status offset. Merge failures are recovered from by
    /// parsing the unmerged text.
    pub fn parse_text_content(&mut self, text: &str) -> Result<Vec<PlayerRecord>, ParseError> {
        self.parse_with(text, STAGES)
    }

    fn parse_with(
        &mut self,
        text: &str,
        stages: Stages,
    ) -> Result<Vec<PlayerRecord>, ParseError> {
        self.stats = ParsingStats::default();
        self.unparsed_lines.clear();

        let length = text.chars().count();
        if length < self.config.min_text_length {
            let mut details = Details::new();
            details.insert("input_length".to_string(), json!(length));
            details.insert(
                "min_text_length".to_string(),
                json!(self.config.min_text_length),
            );
            self.notify(
                Severity::Warning,
                "Injury report text rejected",
                &format!(
                    "Input of {length} characters is shorter than the {}-character minimum",
                    self.config.min_text_length
                ),
                details,
            );
            return Ok(Vec::new());
        }

        match self.run_pipeline(text, stages) {
            Ok(records) => {
                self.report_outcome(&records);
                Ok(records)
            }
            Err(e) => {
                let mut details = self.stats_details();
                details.insert("error_type".to_string(), json!(e.kind()));
                details.insert("error".to_string(), json!(e.to_string()));
                details.insert("input_length".to_string(), json!(length));
                self.notify(
                    Severity::Error,
                    "Injury report parsing failed",
                    &e.to_string(),
                    details,
                );
                Err(e)
            }
        }
    }

    /// Statistics from the most recent parse call.
    #[must_use]
    pub fn parsing_stats(&self) -> ParsingStatsReport {
        ParsingStatsReport {
            stats: self.stats.clone(),
            sample_unparsed_lines: self.unparsed_lines.clone(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn run_pipeline(
        &mut self,
        text: &str,
        stages: Stages,
    ) -> Result<Vec<PlayerRecord>, ParseError> {
        let text = text
            .find(PARSED_RECORDS_MARKER)
            .map_or(text, |pos| &text[..pos]);

        self.stats.total_lines = text.lines().filter(|l| !l.trim().is_empty()).count() as u64;

        let merged = match (stages.merge)(text, &self.vocab) {
            Ok(out) => {
                self.stats.merged_multiline = out.merges;
                out.text
            }
            Err(e) => {
                log::warn!("Multi-line merge failed, parsing unmerged text: {e}");
                text.to_string()
            }
        };

        let lines: Vec<&str> = merged
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let sections = identify_game_sections(&lines);
        self.stats.game_sections = sections.len() as u64;

        let mut tally = ExtractionTally::default();
        let records = (stages.extract)(
            &lines,
            &sections,
            &self.vocab,
            self.config.max_unparsed_samples,
            &mut tally,
        )?;

        self.stats.player_lines_found = tally.player_lines;
        self.stats.unparsed_count = tally.unparsed;
        self.unparsed_lines = tally.samples;
        for record in &records {
            self.stats.confidence_distribution.record(record.confidence);
        }

        log::debug!(
            "Parsed {} records from {} lines ({} sections, {} merges, {} unparsed)",
            records.len(),
            self.stats.total_lines,
            self.stats.game_sections,
            self.stats.merged_multiline,
            self.stats.unparsed_count,
        );

        Ok(records)
    }

    fn report_outcome(&self, records: &[PlayerRecord]) {
        let mut details = self.stats_details();

        match ParseOutcome::assess(records, &self.config) {
            ParseOutcome::NoRecords => {
                details.insert(
                    "sample_unparsed_lines".to_string(),
                    json!(self.unparsed_lines),
                );
                self.notify(
                    Severity::Warning,
                    "No injury records found",
                    &format!(
                        "Parsed {} lines in {} game sections without finding a player",
                        self.stats.total_lines, self.stats.game_sections
                    ),
                    details,
                );
            }
            ParseOutcome::LowConfidence { low, total, ratio } => {
                details.insert("low_confidence_count".to_string(), json!(low));
                details.insert("low_confidence_ratio".to_string(), json!(ratio));
                self.notify(
                    Severity::Warning,
                    "Low confidence results",
                    &format!(
                        "{low} of {total} records scored below {}",
                        self.config.low_confidence_threshold
                    ),
                    details,
                );
            }
            ParseOutcome::Parsed { total } => {
                details.insert("records".to_string(), json!(total));
                self.notify(
                    Severity::Info,
                    "Injury report parsed",
                    &format!(
                        "{total} records from {} game sections",
                        self.stats.game_sections
                    ),
                    details,
                );
            }
        }
    }

    fn stats_details(&self) -> Details {
        match serde_json::to_value(&self.stats) {
            Ok(Value::Object(map)) => map,
            _ => Details::new(),
        }
    }

    fn notify(&self, severity: Severity, title: &str, message: &str, details: Details) {
        dispatch(self.notifier.as_ref(), severity, title, message, &details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(confidence: f64) -> PlayerRecord {
        PlayerRecord {
            date: String::new(),
            gametime: String::new(),
            matchup: String::new(),
            team: UNKNOWN_TEAM.to_string(),
            player: "Doe, John".to_string(),
            status: InjuryStatus::Out,
            reason: String::new(),
            confidence,
        }
    }

    #[test]
    fn outcome_flags_low_confidence_share() {
        let config = ParserConfig::default();

        let mut records: Vec<PlayerRecord> = (0..6).map(|_| record(1.0)).collect();
        records.extend((0..4).map(|_| record(0.2)));
        match ParseOutcome::assess(&records, &config) {
            ParseOutcome::LowConfidence { low, total, ratio } => {
                assert_eq!(low, 4);
                assert_eq!(total, 10);
                assert!((ratio - 0.4).abs() < 1e-9);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let mostly_fine: Vec<PlayerRecord> = (0..7)
            .map(|_| record(0.9))
            .chain((0..3).map(|_| record(0.0)))
            .collect();
        assert_eq!(
            ParseOutcome::assess(&mostly_fine, &config),
            ParseOutcome::Parsed { total: 10 }
        );

        assert_eq!(ParseOutcome::assess(&[], &config), ParseOutcome::NoRecords);
    }

    #[test]
    fn threshold_is_exclusive() {
        let config = ParserConfig::default();
        let records = vec![record(0.5), record(0.4)];
        assert!(matches!(
            ParseOutcome::assess(&records, &config),
            ParseOutcome::LowConfidence { low: 1, .. }
        ));
    }

    #[test]
    fn error_kinds_are_stable() {
        let err = ParseError::Merge {
            line: "x".to_string(),
            message: "y".to_string(),
        };
        assert_eq!(err.kind(), "merge");
        assert_eq!(ParseError::Config("bad".to_string()).kind(), "config");
    }

    const REPORT: &str = "Injury Report: 01/15/25 05:00 PM
Game Date Game Time Matchup Team Player Name Current Status Reason
01/15/2025 07:30 (ET) LAL@BOS Los Angeles Lakers
Injury/Illness - Right Knee; Sprain
James, LeBron Questionable
Return to Competition Reconditioning
";

    fn failing_merge(text: &str, _vocab: &Vocabulary) -> Result<MergeOutput, ParseError> {
        Err(ParseError::Merge {
            line: text.lines().next().unwrap_or_default().to_string(),
            message: "split failed".to_string(),
        })
    }

    fn failing_extract(
        lines: &[&str],
        _sections: &[GameSection],
        _vocab: &Vocabulary,
        _max_samples: usize,
        _tally: &mut ExtractionTally,
    ) -> Result<Vec<PlayerRecord>, ParseError> {
        Err(ParseError::Extraction {
            line: lines.last().copied().unwrap_or_default().to_string(),
            message: "bad offset".to_string(),
        })
    }

    #[test]
    fn merge_failure_parses_unmerged_text() {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut parser = InjuryReportParser::new().with_notifier(notifier.clone());
        let stages = Stages {
            merge: failing_merge,
            ..STAGES
        };

        let records = parser.parse_with(REPORT, stages).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player, "James, LeBron");
        assert_eq!(records[0].reason, "Injury/Illness - Right Knee; Sprain");

        let stats = parser.parsing_stats().stats;
        assert_eq!(stats.merged_multiline, 0);
        assert_eq!(stats.total_lines, 6);

        let diagnostics = notifier.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity < Severity::Error);
    }

    #[test]
    fn pipeline_failure_is_reported_and_returned() {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut parser = InjuryReportParser::new().with_notifier(notifier.clone());
        let stages = Stages {
            extract: failing_extract,
            ..STAGES
        };

        let err = parser.parse_with(REPORT, stages).unwrap_err();
        assert_eq!(err.kind(), "extraction");

        let diagnostics = notifier.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].title, "Injury report parsing failed");
        assert_eq!(diagnostics[0].details["error_type"], "extraction");
        assert_eq!(diagnostics[0].details["input_length"], REPORT.chars().count());
        assert_eq!(diagnostics[0].details["game_sections"], 1);
        assert_eq!(diagnostics[0].details["merged_multiline"], 1);
    }

    #[test]
    fn short_input_resets_stats() {
        let mut parser = InjuryReportParser::new();
        assert!(parser.parse_text_content("").unwrap().is_empty());
        assert_eq!(parser.parsing_stats(), ParsingStatsReport::default());
    }
}
