//! Reason-text recovery for a detected player line.
//!
//! Strategies run in a fixed order and the first one that produces text
//! wins:
//!
//! 1. **Inline**: the text after the status on the player's own line,
//!    completed from the next few lines if it has a known truncated shape.
//! 2. **Previous line**: a standalone reason line directly above.
//! 3. **Forward search**: a standalone reason line within the next two.
//! 4. **Emergency**: only for player lines that also carry a tip-off
//!    time; picks up an orphaned `Injury/Illness` line above and a medical
//!    fragment below.

use crate::ParseError;
use crate::detect::{
    PlayerMatch, detect_player, has_game_time, is_medical_continuation, is_page_marker,
    is_player_or_team_line, starts_with_reason_prefix,
};
use crate::tables::{
    COMPLETION_TERMS, INCOMPLETE_REASON_PATTERNS, INJURY_PREFIX, NAME_LIKE_RE, STATUS_RE,
    Vocabulary, contains_any,
};

/// Lines scanned when completing a truncated inline reason.
const COMPLETION_WINDOW: usize = 3;

/// Lines scanned by the forward search.
const FORWARD_WINDOW: usize = 2;

/// Which strategy produced a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonSource {
    /// Same line as the player.
    Inline,
    /// The line directly above.
    PreviousLine,
    /// One of the next lines.
    ForwardSearch,
    /// Orphaned fragments around a game-header player line.
    Emergency,
}

/// Raw reason text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredReason {
    /// Uncleaned text.
    pub text: String,
    /// Strategy that found it.
    pub source: ReasonSource,
}

/// Recovers the reason for the player found on `lines[idx]`.
///
/// # Errors
///
/// Returns [`ParseError::Extraction`] if the player match offsets do not
/// fall on the line's character boundaries.
pub fn recover_reason<S: AsRef<str>>(
    lines: &[S],
    idx: usize,
    hit: &PlayerMatch,
    vocab: &Vocabulary,
) -> Result<Option<RecoveredReason>, ParseError> {
    let Some(line) = lines.get(idx).map(AsRef::as_ref) else {
        return Ok(None);
    };

    if let Some(inline) = inline_reason(line, hit.status_end)? {
        let text = if is_incomplete_reason(&inline) {
            complete_from_following(lines, idx, inline, vocab)
        } else {
            inline
        };
        return Ok(Some(RecoveredReason {
            text,
            source: ReasonSource::Inline,
        }));
    }

    if let Some(prev) = idx
        .checked_sub(1)
        .and_then(|p| lines.get(p))
        .map(AsRef::as_ref)
        .filter(|l| starts_with_reason_prefix(l))
    {
        return Ok(Some(RecoveredReason {
            text: prev.to_string(),
            source: ReasonSource::PreviousLine,
        }));
    }

    for next in lines.iter().skip(idx + 1).take(FORWARD_WINDOW).map(AsRef::as_ref) {
        if is_page_marker(next) || is_player_or_team_line(next, vocab) {
            break;
        }
        if starts_with_reason_prefix(next) {
            return Ok(Some(RecoveredReason {
                text: next.to_string(),
                source: ReasonSource::ForwardSearch,
            }));
        }
    }

    Ok(emergency_reason(lines, idx, line, vocab).map(|text| RecoveredReason {
        text,
        source: ReasonSource::Emergency,
    }))
}

/// Text between the status word and the next status word (or end of
/// line), unless it is empty or reads like another player's name.
fn inline_reason(line: &str, status_end: usize) -> Result<Option<String>, ParseError> {
    let rest = line.get(status_end..).ok_or_else(|| ParseError::Extraction {
        line: line.to_string(),
        message: format!("status end {status_end} is not a character boundary"),
    })?;

    let bounded = match STATUS_RE.find(rest) {
        Some(m) => rest.get(..m.start()).unwrap_or(rest),
        None => rest,
    };

    let trimmed = bounded.trim();
    if trimmed.is_empty() || NAME_LIKE_RE.is_match(trimmed) {
        return Ok(None);
    }

    Ok(Some(trimmed.to_string()))
}

fn is_incomplete_reason(reason: &str) -> bool {
    INCOMPLETE_REASON_PATTERNS
        .iter()
        .any(|re| re.is_match(reason))
}

/// Appends the first following line that carries a completion term.
/// Stops at the next player, team, or page marker. Standalone reason lines
/// belong to a neighbouring player and are never appended.
fn complete_from_following<S: AsRef<str>>(
    lines: &[S],
    idx: usize,
    reason: String,
    vocab: &Vocabulary,
) -> String {
    for next in lines
        .iter()
        .skip(idx + 1)
        .take(COMPLETION_WINDOW)
        .map(AsRef::as_ref)
    {
        if is_page_marker(next) || is_player_or_team_line(next, vocab) {
            break;
        }
        if starts_with_reason_prefix(next) {
            continue;
        }
        if contains_any(&next.to_lowercase(), COMPLETION_TERMS) {
            log::debug!("Completed truncated reason '{reason}' with '{next}'");
            return format!("{reason} {next}");
        }
    }
    reason
}

fn emergency_reason<S: AsRef<str>>(
    lines: &[S],
    idx: usize,
    line: &str,
    vocab: &Vocabulary,
) -> Option<String> {
    if !has_game_time(line) {
        return None;
    }

    let mut parts: Vec<&str> = Vec::with_capacity(2);

    if let Some(prev) = idx
        .checked_sub(1)
        .and_then(|p| lines.get(p))
        .map(AsRef::as_ref)
        && prev.starts_with(INJURY_PREFIX)
    {
        parts.push(prev);
    }

    if let Some(next) = lines.get(idx + 1).map(AsRef::as_ref)
        && is_medical_continuation(next, vocab)
        && detect_player(next).is_none()
    {
        parts.push(next);
    }

    if parts.is_empty() {
        None
    } else {
        log::debug!("Emergency reason recovery for line '{line}'");
        Some(parts.join(" "))
    }
}
