//! Game-section segmentation.
//!
//! A report is a run of game blocks. Any line carrying a date, a tip-off
//! time, or a matchup code starts a new block; header fields a line does
//! not supply carry over from the block before it.

use crate::detect::header_fields;

/// A contiguous run of lines belonging to one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSection {
    /// Game date (`MM/DD/YYYY`), or empty if none seen yet.
    pub date: String,
    /// Tip-off time, or empty if none seen yet.
    pub gametime: String,
    /// Matchup code, or empty if none seen yet.
    pub matchup: String,
    /// First line index (inclusive).
    pub start_line: usize,
    /// Last line index (exclusive).
    pub end_line: usize,
}

impl GameSection {
    /// Line indices covered by this section.
    #[must_use]
    pub const fn lines(&self) -> std::ops::Range<usize> {
        self.start_line..self.end_line
    }
}

/// Splits `lines` into game sections.
///
/// Lines before the first header belong to no section. Returns an empty
/// list when no header line exists.
#[must_use]
pub fn identify_game_sections<S: AsRef<str>>(lines: &[S]) -> Vec<GameSection> {
    let mut sections = Vec::new();
    let mut open: Option<GameSection> = None;

    let mut date = String::new();
    let mut gametime = String::new();
    let mut matchup = String::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(fields) = header_fields(line.as_ref()) else {
            continue;
        };

        if let Some(mut section) = open.take() {
            section.end_line = idx;
            sections.push(section);
        }

        if let Some(d) = fields.date {
            date = d;
        }
        if let Some(t) = fields.gametime {
            gametime = t;
        }
        if let Some(m) = fields.matchup {
            matchup = m;
        }

        open = Some(GameSection {
            date: date.clone(),
            gametime: gametime.clone(),
            matchup: matchup.clone(),
            start_line: idx,
            end_line: lines.len(),
        });
    }

    if let Some(mut section) = open {
        section.end_line = lines.len();
        sections.push(section);
    }

    if sections.is_empty() {
        log::warn!(
            "No game sections identified in {} lines (no date, time, or matchup found)",
            lines.len()
        );
    } else {
        log::debug!("Identified {} game sections", sections.len());
    }

    sections
}
