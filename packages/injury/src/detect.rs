//! Line classifiers shared by the merge pass, segmentation, and
//! extraction.

use sports_etl_injury_models::InjuryStatus;

use crate::ParseError;
use crate::tables::{
    ANCHORED_NAME_RE, DATE_RE, GAME_TIME_RE, MATCHUP_RE, PAGE_MARKER_RE, PLAYER_PATTERNS,
    REASON_PREFIXES, STATUS_RE, TEAM_CODE_RE, TEAM_LINE_EXCLUSIONS, TEAM_NAME_RE, Vocabulary,
};

/// Continuation lines must be shorter than this many words.
const MAX_CONTINUATION_WORDS: usize = 6;

/// A player name and status found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerMatch {
    /// Last-name part, cleaned of team strings.
    pub last: String,
    /// First-name part, cleaned of team strings.
    pub first: String,
    /// Status word that followed the name.
    pub status: InjuryStatus,
    /// Byte offset just past the status word.
    pub status_end: usize,
}

impl PlayerMatch {
    /// `"Last, First"`.
    #[must_use]
    pub fn player(&self) -> String {
        format!("{}, {}", self.last, self.first)
    }
}

/// A line split around its first status word, where everything before
/// the status is a bare player name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAnchor<'a> {
    /// Name text before the status.
    pub name: &'a str,
    /// Status word.
    pub status: InjuryStatus,
    /// Trimmed text after the status.
    pub remainder: &'a str,
}

/// Header fields a line supplies. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    /// `MM/DD/YYYY`.
    pub date: Option<String>,
    /// `H:MM (ET)`.
    pub gametime: Option<String>,
    /// `AAA@BBB`.
    pub matchup: Option<String>,
}

/// Extracts the game-header fields on `line`, if it has any.
#[must_use]
pub fn header_fields(line: &str) -> Option<HeaderFields> {
    let fields = HeaderFields {
        date: DATE_RE.captures(line).map(|c| c[1].to_string()),
        gametime: GAME_TIME_RE
            .captures(line)
            .map(|c| format!("{} (ET)", &c[1])),
        matchup: MATCHUP_RE.captures(line).map(|c| c[1].to_string()),
    };

    if fields.date.is_none() && fields.gametime.is_none() && fields.matchup.is_none() {
        None
    } else {
        Some(fields)
    }
}

/// Returns `true` if `line` carries a tip-off time.
#[must_use]
pub fn has_game_time(line: &str) -> bool {
    GAME_TIME_RE.is_match(line)
}

/// Returns `true` for page header/footer lines.
#[must_use]
pub fn is_page_marker(line: &str) -> bool {
    PAGE_MARKER_RE.is_match(line)
}

/// Returns `true` if `line` opens a standalone reason.
#[must_use]
pub fn starts_with_reason_prefix(line: &str) -> bool {
    let trimmed = line.trim_start();
    REASON_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Returns the code of the team `line` introduces, if any.
///
/// Page and report header lines never set team context. When several
/// teams are named, the rightmost wins since it sits next to the players
/// that follow.
#[must_use]
pub fn team_mention(line: &str, vocab: &Vocabulary) -> Option<&'static str> {
    if TEAM_LINE_EXCLUSIONS.iter().any(|x| line.contains(x)) {
        return None;
    }
    let last = TEAM_NAME_RE.find_iter(line).last()?;
    vocab.team_code(last.as_str())
}

/// Runs the player patterns in order; the first that matches decides.
#[must_use]
pub fn detect_player(line: &str) -> Option<PlayerMatch> {
    let caps = PLAYER_PATTERNS.iter().find_map(|re| re.captures(line))?;

    let last = strip_team_strings(caps.get(1)?.as_str());
    let first = strip_team_strings(caps.get(2)?.as_str());
    if last.is_empty() || first.is_empty() {
        return None;
    }

    let status_match = caps.get(3)?;
    let status = status_match.as_str().parse().ok()?;

    Some(PlayerMatch {
        last,
        first,
        status,
        status_end: status_match.end(),
    })
}

/// Returns `true` if `line` names a player or a team.
#[must_use]
pub fn is_player_or_team_line(line: &str, vocab: &Vocabulary) -> bool {
    detect_player(line).is_some() || team_mention(line, vocab).is_some()
}

/// Returns `true` if `line` reads like the tail of a medical reason: a
/// short line with medical vocabulary that does not start a new reason.
#[must_use]
pub fn is_medical_continuation(line: &str, vocab: &Vocabulary) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.split_whitespace().count() < MAX_CONTINUATION_WORDS
        && !starts_with_reason_prefix(trimmed)
        && vocab.has_medical_term(trimmed)
}

/// Splits `line` at its first status word when the text before it is a
/// bare `Last, First` name.
///
/// # Errors
///
/// Returns [`ParseError::Merge`] if the status offsets do not fall on
/// character boundaries of `line`.
pub fn split_on_status(line: &str) -> Result<Option<StatusAnchor<'_>>, ParseError> {
    let Some(m) = STATUS_RE.find(line) else {
        return Ok(None);
    };

    let before = line
        .get(..m.start())
        .ok_or_else(|| merge_error(line, "status offset is not a character boundary"))?
        .trim();
    let after = line
        .get(m.end()..)
        .ok_or_else(|| merge_error(line, "status end is not a character boundary"))?
        .trim();

    if !ANCHORED_NAME_RE.is_match(before) {
        return Ok(None);
    }

    let Ok(status) = m.as_str().parse() else {
        return Ok(None);
    };

    Ok(Some(StatusAnchor {
        name: before,
        status,
        remainder: after,
    }))
}

/// Removes team names, codes, and matchup pairs from a captured name part.
fn strip_team_strings(part: &str) -> String {
    let without_names = TEAM_NAME_RE.replace_all(part, " ");
    let without_codes = TEAM_CODE_RE.replace_all(&without_names, " ");
    without_codes
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn merge_error(line: &str, message: &str) -> ParseError {
    ParseError::Merge {
        line: line.to_string(),
        message: message.to_string(),
    }
}
