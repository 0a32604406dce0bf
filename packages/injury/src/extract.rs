//! Per-section record extraction.

use sports_etl_injury_models::{PlayerRecord, UNKNOWN_TEAM};

use crate::ParseError;
use crate::detect::{detect_player, team_mention};
use crate::reason::recover_reason;
use crate::scoring::{calculate_confidence, clean_reason};
use crate::sections::GameSection;
use crate::tables::{STATUS_RE, Vocabulary};

/// Counters and samples gathered while extracting.
#[derive(Debug, Default)]
pub struct ExtractionTally {
    /// Lines that produced a record.
    pub player_lines: u64,
    /// Lines that mention a status word but yielded no record.
    pub unparsed: u64,
    /// First few unparsed lines, for diagnostics.
    pub samples: Vec<String>,
}

impl ExtractionTally {
    fn note_unparsed(&mut self, line: &str, max_samples: usize) {
        self.unparsed += 1;
        if self.samples.len() < max_samples {
            self.samples.push(line.to_string());
        }
    }
}

/// Extracts the player records in one game section.
///
/// Team context starts as [`UNKNOWN_TEAM`] and changes whenever a line
/// names a team. A line is checked for a team before it is checked for a
/// player, so a player on the same line as a team name belongs to it.
///
/// # Errors
///
/// Returns [`ParseError::Extraction`] if a matched line cannot be sliced
/// at its status offset.
pub fn extract_section<S: AsRef<str>>(
    lines: &[S],
    section: &GameSection,
    vocab: &Vocabulary,
    max_samples: usize,
    tally: &mut ExtractionTally,
) -> Result<Vec<PlayerRecord>, ParseError> {
    let mut records = Vec::new();
    let mut team = UNKNOWN_TEAM;

    for idx in section.lines() {
        let Some(line) = lines.get(idx).map(AsRef::as_ref) else {
            break;
        };

        if let Some(code) = team_mention(line, vocab) {
            team = code;
        }

        let Some(hit) = detect_player(line) else {
            if STATUS_RE.is_match(line) {
                log::trace!("Unparsed status line: {line}");
                tally.note_unparsed(line, max_samples);
            }
            continue;
        };

        let reason = recover_reason(lines, idx, &hit, vocab)?
            .map(|found| {
                log::trace!("Reason for {} via {:?}", hit.player(), found.source);
                clean_reason(&found.text, vocab)
            })
            .unwrap_or_default();
        let confidence = calculate_confidence(&reason);

        tally.player_lines += 1;
        records.push(PlayerRecord {
            date: section.date.clone(),
            gametime: section.gametime.clone(),
            matchup: section.matchup.clone(),
            team: team.to_string(),
            player: hit.player(),
            status: hit.status,
            reason,
            confidence,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use sports_etl_injury_models::InjuryStatus;

    use super::*;
    use crate::sections::identify_game_sections;

    fn extract(lines: &[&str]) -> (Vec<PlayerRecord>, ExtractionTally) {
        let vocab = Vocabulary::default();
        let mut tally = ExtractionTally::default();
        let mut records = Vec::new();
        for section in identify_game_sections(lines) {
            records.extend(extract_section(lines, &section, &vocab, 2, &mut tally).unwrap());
        }
        (records, tally)
    }

    #[test]
    fn records_carry_section_and_team() {
        let (records, tally) = extract(&[
            "01/15/2025 7:30 (ET) MIA@DET",
            "Miami Heat",
            "Butler, Jimmy Out Injury/Illness - Left Ankle; Sprain",
            "Detroit Pistons",
            "Stewart, Isaiah Questionable Injury/Illness - Left Knee; Soreness",
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(tally.player_lines, 2);

        assert_eq!(records[0].team, "MIA");
        assert_eq!(records[0].player, "Butler, Jimmy");
        assert_eq!(records[0].date, "01/15/2025");
        assert_eq!(records[0].matchup, "MIA@DET");
        assert_eq!(records[0].reason, "Injury/Illness - Left Ankle; Sprain");

        assert_eq!(records[1].team, "DET");
        assert_eq!(records[1].status, InjuryStatus::Questionable);
    }

    #[test]
    fn team_resets_each_section() {
        let (records, _) = extract(&[
            "MIA@DET",
            "Miami Heat",
            "Butler, Jimmy Out Personal Reasons",
            "LAL@BOS",
            "Tatum, Jayson Probable Injury/Illness - Right Wrist; Sprain",
        ]);
        assert_eq!(records[0].team, "MIA");
        assert_eq!(records[1].team, UNKNOWN_TEAM);
    }

    #[test]
    fn missing_reason_scores_zero() {
        let (records, _) = extract(&["MIA@DET", "Butler, Jimmy Out"]);
        assert_eq!(records[0].reason, "");
        assert!(records[0].confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn status_lines_without_a_name_are_sampled() {
        let (records, tally) = extract(&[
            "MIA@DET",
            "Out for the season",
            "Probable starters listed",
            "Questionable rotation",
        ]);
        assert!(records.is_empty());
        assert_eq!(tally.unparsed, 3);
        assert_eq!(tally.samples.len(), 2);
    }
}
