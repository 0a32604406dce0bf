#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types shared by the injury report parser and its consumers.
//!
//! The parser emits one [`PlayerRecord`] per player line it recognizes
//! and keeps a [`ParsingStats`] tally for the most recent parse. Both
//! serialize to the flat JSON shape the warehouse loaders expect.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Team code emitted when no team context was established for a player.
pub const UNKNOWN_TEAM: &str = "UNKNOWN";

/// Scores at or above this value count as high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Scores at or above this value (and below [`HIGH_CONFIDENCE`]) count as
/// medium confidence. Anything lower is low confidence.
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

/// A player's availability designation on the league injury report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum InjuryStatus {
    /// Will not play.
    Out,
    /// Roughly even odds of playing.
    Questionable,
    /// Unlikely to play.
    Doubtful,
    /// Likely to play.
    Probable,
    /// Cleared to play.
    Available,
}

impl InjuryStatus {
    /// Every status, in the order the report legend lists them.
    pub const ALL: &[Self] = &[
        Self::Out,
        Self::Questionable,
        Self::Doubtful,
        Self::Probable,
        Self::Available,
    ];
}

/// One player entry recovered from an injury report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Game date exactly as printed (`MM/DD/YYYY`), or empty.
    pub date: String,
    /// Tip-off time as printed (e.g. `"7:30 (ET)"`), or empty.
    pub gametime: String,
    /// Away@home code pair (e.g. `"MIA@DET"`), or empty.
    pub matchup: String,
    /// Three-letter team code, or [`UNKNOWN_TEAM`].
    pub team: String,
    /// `"Last, First"` with any generational suffix kept.
    pub player: String,
    /// Report designation.
    pub status: InjuryStatus,
    /// Free-text reason; empty when none could be recovered.
    pub reason: String,
    /// Extraction reliability in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// Counts of records per confidence band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceDistribution {
    /// Records scoring at least [`HIGH_CONFIDENCE`].
    pub high: u64,
    /// Records scoring at least [`MEDIUM_CONFIDENCE`] but below high.
    pub medium: u64,
    /// Records scoring below [`MEDIUM_CONFIDENCE`].
    pub low: u64,
}

impl ConfidenceDistribution {
    /// Buckets one confidence score.
    pub fn record(&mut self, confidence: f64) {
        if confidence >= HIGH_CONFIDENCE {
            self.high += 1;
        } else if confidence >= MEDIUM_CONFIDENCE {
            self.medium += 1;
        } else {
            self.low += 1;
        }
    }

    /// Total number of bucketed scores.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }
}

/// Counters for a single parse call. Reset at the start of every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingStats {
    /// Non-empty lines in the input after pre-cleaning.
    pub total_lines: u64,
    /// Lines that yielded a player record.
    pub player_lines_found: u64,
    /// Multi-line merges performed by the preprocessor.
    pub merged_multiline: u64,
    /// Lines inside game sections that matched nothing useful.
    pub unparsed_count: u64,
    /// Game sections identified by segmentation.
    pub game_sections: u64,
    /// Confidence bands of the emitted records.
    pub confidence_distribution: ConfidenceDistribution,
}

/// Snapshot returned to callers after a parse: the counters plus a
/// bounded sample of lines that could not be interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingStatsReport {
    /// Counters from the most recent parse.
    #[serde(flatten)]
    pub stats: ParsingStats,
    /// Up to ten unparsed lines, in input order.
    pub sample_unparsed_lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in InjuryStatus::ALL {
            let parsed: InjuryStatus = status.as_ref().parse().unwrap();
            assert_eq!(parsed, *status);
        }
        assert_eq!(InjuryStatus::Questionable.to_string(), "Questionable");
        assert!("Injured".parse::<InjuryStatus>().is_err());
    }

    #[test]
    fn distribution_buckets_by_threshold() {
        let mut dist = ConfidenceDistribution::default();
        for score in [1.0, 0.8, 0.79, 0.5, 0.49, 0.0] {
            dist.record(score);
        }
        assert_eq!(dist.high, 2);
        assert_eq!(dist.medium, 2);
        assert_eq!(dist.low, 2);
        assert_eq!(dist.total(), 6);
    }

    #[test]
    fn record_serializes_with_eight_fields() {
        let record = PlayerRecord {
            date: "01/15/2025".to_string(),
            gametime: "7:30 (ET)".to_string(),
            matchup: "MIA@DET".to_string(),
            team: "DET".to_string(),
            player: "Stewart, Isaiah".to_string(),
            status: InjuryStatus::Out,
            reason: "Injury/Illness - Left Knee; Sprain".to_string(),
            confidence: 1.0,
        };
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 8);
        assert_eq!(obj["status"], "Out");
        assert_eq!(obj["team"], "DET");
    }

    #[test]
    fn stats_report_flattens_counters() {
        let report = ParsingStatsReport {
            stats: ParsingStats {
                total_lines: 12,
                ..ParsingStats::default()
            },
            sample_unparsed_lines: vec!["garbage".to_string()],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total_lines"], 12);
        assert_eq!(value["sample_unparsed_lines"][0], "garbage");
    }
}
