//! Multi-line injury merge.
//!
//! Some reports wrap a single entry over two or three physical lines:
//!
//! ```text
//! Injury/Illness - Right Knee; Sprain
//! James, LeBron Questionable
//! Return to Competition Reconditioning
//! ```
//!
//! This pass folds such runs back into one line that the regular
//! extraction can read:
//!
//! ```text
//! James, LeBron Questionable Injury/Illness - Right Knee; Sprain Return to Competition Reconditioning
//! ```

use crate::ParseError;
use crate::detect::{
    detect_player, is_medical_continuation, is_player_or_team_line, split_on_status,
};
use crate::tables::{INCOMPLETE_INJURY_PATTERNS, INJURY_PREFIX, Vocabulary};

/// Result of the merge pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput {
    /// Rewritten text, one logical entry per line.
    pub text: String,
    /// Number of merges performed.
    pub merges: u64,
}

/// Returns `true` for an `Injury/Illness` line whose reason seems to
/// continue on a later line.
#[must_use]
pub fn is_incomplete_injury(line: &str) -> bool {
    line.starts_with(INJURY_PREFIX)
        && line.contains(';')
        && (line.ends_with(';') || INCOMPLETE_INJURY_PATTERNS.iter().any(|re| re.is_match(line)))
}

/// Folds wrapped injury entries back onto their player line.
///
/// # Errors
///
/// Returns [`ParseError::Merge`] if a line cannot be split at its status
/// word. Callers fall back to the unmerged text.
pub fn merge_multiline_injuries(text: &str, vocab: &Vocabulary) -> Result<MergeOutput, ParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut merges = 0_u64;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];

        let Some(&next) = lines.get(idx + 1) else {
            out.push(line.to_string());
            idx += 1;
            continue;
        };

        if !is_incomplete_injury(line) {
            out.push(line.to_string());
            idx += 1;
            continue;
        }

        let third = lines.get(idx + 2).copied();

        if let Some(anchor) = split_on_status(next)? {
            let prefix = format!("{} {}", anchor.name, anchor.status);

            if !anchor.remainder.is_empty() && is_medical_continuation(anchor.remainder, vocab) {
                if let Some(third) = third
                    && is_medical_continuation(third, vocab)
                    && detect_player(third).is_none()
                {
                    log::debug!("Merged three-line entry for {}", anchor.name);
                    out.push(format!("{prefix} {line} {} {third}", anchor.remainder));
                    idx += 3;
                } else {
                    log::debug!("Merged two-line entry for {}", anchor.name);
                    out.push(format!("{prefix} {line} {}", anchor.remainder));
                    idx += 2;
                }
                merges += 1;
                continue;
            }

            idx += push_with_continuation(&mut out, line, next, third, vocab, &mut merges);
            continue;
        }

        if detect_player(next).is_some() {
            idx += push_with_continuation(&mut out, line, next, third, vocab, &mut merges);
            continue;
        }

        out.push(line.to_string());
        idx += 1;
    }

    Ok(MergeOutput {
        text: out.join("\n"),
        merges,
    })
}

/// Handles a player line that carries no reason of its own: when the
/// line after it finishes the injury, all three collapse onto the player
/// line. Returns how many input lines were consumed.
fn push_with_continuation(
    out: &mut Vec<String>,
    injury: &str,
    player_line: &str,
    third: Option<&str>,
    vocab: &Vocabulary,
    merges: &mut u64,
) -> usize {
    if let Some(third) = third
        && is_medical_continuation(third, vocab)
        && !is_player_or_team_line(third, vocab)
    {
        log::debug!("Merged wrapped injury onto player line '{player_line}'");
        out.push(format!("{player_line} {injury} {third}"));
        *merges += 1;
        return 3;
    }

    out.push(injury.to_string());
    out.push(player_line.to_string());
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(text: &str) -> MergeOutput {
        merge_multiline_injuries(text, &Vocabulary::default()).unwrap()
    }

    #[test]
    fn recognizes_incomplete_injury_lines() {
        assert!(is_incomplete_injury("Injury/Illness - Left Ankle;"));
        assert!(is_incomplete_injury("Injury/Illness - Right Knee; Sprain"));
        assert!(is_incomplete_injury("Injury/Illness - Low Back; Muscle Spasms"));
        assert!(!is_incomplete_injury("Injury/Illness - Left Ankle"));
        assert!(!is_incomplete_injury("G League - Two-Way;"));
        assert!(!is_incomplete_injury(
            "Injury/Illness - Right Knee; Sprain; Return to competition"
        ));
    }

    #[test]
    fn folds_player_line_between_injury_and_continuation() {
        let out = merge(
            "Injury/Illness - Right Knee; Sprain\n\
             James, LeBron Questionable\n\
             Return to Competition Reconditioning",
        );
        assert_eq!(
            out.text,
            "James, LeBron Questionable Injury/Illness - Right Knee; Sprain Return to Competition Reconditioning"
        );
        assert_eq!(out.merges, 1);
    }

    #[test]
    fn folds_remainder_from_player_line() {
        let out = merge(
            "Injury/Illness - Left Ankle;\n\
             Smith, Jalen Out Sprain\n\
             Miami Heat",
        );
        assert_eq!(
            out.text,
            "Smith, Jalen Out Injury/Illness - Left Ankle; Sprain\nMiami Heat"
        );
        assert_eq!(out.merges, 1);
    }

    #[test]
    fn folds_remainder_and_third_line() {
        let out = merge(
            "Injury/Illness - Left Achilles;\n\
             Lillard, Damian Out Tendon\n\
             Rupture Repair",
        );
        assert_eq!(
            out.text,
            "Lillard, Damian Out Injury/Illness - Left Achilles; Tendon Rupture Repair"
        );
        assert_eq!(out.merges, 1);
    }

    #[test]
    fn keeps_lines_when_nothing_continues() {
        let text = "Injury/Illness - Left Ankle; Sprain\nStewart, Isaiah Out\nMiami Heat";
        let out = merge(text);
        assert_eq!(out.text, text);
        assert_eq!(out.merges, 0);
    }

    #[test]
    fn loose_player_match_still_merges() {
        let out = merge(
            "Injury/Illness - Right Knee; Sprain\n\
             7:30 (ET) LAL@BOS James, LeBron Questionable\n\
             Reconditioning",
        );
        assert_eq!(
            out.text,
            "7:30 (ET) LAL@BOS James, LeBron Questionable Injury/Illness - Right Knee; Sprain Reconditioning"
        );
        assert_eq!(out.merges, 1);
    }

    #[test]
    fn drops_blank_lines_and_trims() {
        let out = merge("  Miami Heat  \n\n   Stewart, Isaiah Out\n");
        assert_eq!(out.text, "Miami Heat\nStewart, Isaiah Out");
    }
}
