#![allow(clippy::too_many_lines)]
//! Vocabulary and pattern tables for injury report parsing.
//!
//! These tables encode the layout quirks of the league's PDF injury
//! reports: which words are statuses, which phrases open a reason, which
//! medical words signal that a line continues a reason, and which text
//! shapes mean the PDF-to-text step cut a word off. They are immutable;
//! per-instance additions live in [`Vocabulary`].

use std::sync::LazyLock;

use regex::Regex;

use crate::ParseError;
use crate::config::ParserConfig;

/// Full team names and their three-letter report codes.
pub const TEAMS: &[(&str, &str)] = &[
    ("Atlanta Hawks", "ATL"),
    ("Boston Celtics", "BOS"),
    ("Brooklyn Nets", "BKN"),
    ("Charlotte Hornets", "CHA"),
    ("Chicago Bulls", "CHI"),
    ("Cleveland Cavaliers", "CLE"),
    ("Dallas Mavericks", "DAL"),
    ("Denver Nuggets", "DEN"),
    ("Detroit Pistons", "DET"),
    ("Golden State Warriors", "GSW"),
    ("Houston Rockets", "HOU"),
    ("Indiana Pacers", "IND"),
    ("LA Clippers", "LAC"),
    ("Los Angeles Lakers", "LAL"),
    ("Memphis Grizzlies", "MEM"),
    ("Miami Heat", "MIA"),
    ("Milwaukee Bucks", "MIL"),
    ("Minnesota Timberwolves", "MIN"),
    ("New Orleans Pelicans", "NOP"),
    ("New York Knicks", "NYK"),
    ("Oklahoma City Thunder", "OKC"),
    ("Orlando Magic", "ORL"),
    ("Philadelphia 76ers", "PHI"),
    ("Phoenix Suns", "PHX"),
    ("Portland Trail Blazers", "POR"),
    ("Sacramento Kings", "SAC"),
    ("San Antonio Spurs", "SAS"),
    ("Toronto Raptors", "TOR"),
    ("Utah Jazz", "UTA"),
    ("Washington Wizards", "WAS"),
];

/// Substrings that mark a page header/footer rather than a team block.
pub const TEAM_LINE_EXCLUSIONS: &[&str] = &["Page", "Report", "NOT YET"];

/// Phrases a standalone reason line starts with.
pub const REASON_PREFIXES: &[&str] = &[
    "Injury/Illness",
    "G League",
    "Personal Reasons",
    "League Suspension",
    "Concussion Protocol",
    "Not With Team",
];

/// Prefix added to bare medical descriptions.
pub const INJURY_PREFIX: &str = "Injury/Illness";

/// Lowercase medical vocabulary used to recognize reason continuations.
pub const MEDICAL_TERMS: &[&str] = &[
    "strain",
    "sprain",
    "fracture",
    "surgery",
    "rupture",
    "protocol",
    "tear",
    "torn",
    "contusion",
    "soreness",
    "spasms",
    "tendinopathy",
    "tendinitis",
    "tendon",
    "bursitis",
    "inflammation",
    "dislocation",
    "subluxation",
    "impingement",
    "concussion",
    "illness",
    "reconditioning",
    "return to competition",
    "injury management",
    "management",
    "recovery",
    "repair",
    "reconstruction",
    "procedure",
    "laceration",
    "effusion",
    "irritation",
    "stress reaction",
    "fasciitis",
    "hyperextension",
    "non-displaced",
    "displaced",
    "ligament",
    "meniscus",
    "achilles",
    "hamstring",
    "groin",
    "calf",
    "ankle",
    "knee",
    "hip",
    "low back",
    "shoulder",
    "wrist",
    "finger",
    "thumb",
    "elbow",
    "quadriceps",
    "adductor",
    "oblique",
];

/// Lowercase words that finish a reason the report cut short.
pub const COMPLETION_TERMS: &[&str] = &[
    "rupture",
    "fracture",
    "spasms",
    "protocol",
    "repair",
    "tear",
    "sprain",
    "strain",
    "soreness",
    "surgery",
    "reconditioning",
    "contusion",
    "management",
];

/// Lowercase keywords that indicate a specific diagnosis.
pub const DETAILED_TERMS: &[&str] = &[
    "sprain",
    "strain",
    "fracture",
    "contusion",
    "tendinopathy",
    "tendinitis",
    "surgery",
    "soreness",
    "spasms",
    "inflammation",
    "rupture",
    "tear",
    "reconditioning",
];

/// Reasons too vague to be trusted on their own (compared ignoring case).
pub const GENERIC_REASONS: &[&str] = &[
    "injury",
    "illness",
    "injury/illness",
    "rest",
    "personal",
    "other",
    "unknown",
    "tbd",
];

/// Matches any of the five status words as a whole word.
pub static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Out|Questionable|Doubtful|Probable|Available)\b").expect("valid regex")
});

/// Leading status words left on a reason by a sloppy split.
pub static LEADING_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:Out|Questionable|Doubtful|Probable|Available)\b\s*)+")
        .expect("valid regex")
});

/// `MM/DD/YYYY` game date.
pub static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2}/\d{2}/\d{4})\b").expect("valid regex"));

/// `H:MM (ET)` tip-off time.
pub static GAME_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}:\d{2})\s*\(ET\)").expect("valid regex"));

/// `AAA@BBB` matchup code.
pub static MATCHUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{3}@[A-Z]{3})\b").expect("valid regex"));

/// Page footer / page header markers that end a look-ahead scan.
pub static PAGE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bPage\s+\d+(?:\s+of\s+\d+)?\b|^Injury Report:)").expect("valid regex")
});

/// Player detection patterns, tried in order. Each captures
/// `(last, first, status)`.
///
/// 1. Single-word last name, mandatory space after the comma, dotted
///    suffixes on either part.
/// 2. Multi-word name parts, optional space after the comma, suffixes
///    with or without the period.
/// 3. No space after the comma.
/// 4. Anything letter-like around a comma.
pub static PLAYER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\p{Lu}[\p{L}'.\-]*(?:\s(?:Jr\.|Sr\.|II|III|IV))?),\s(\p{Lu}[\p{L}'.\-]*(?:\s(?:Jr\.|Sr\.|II|III|IV))?)\s+(Out|Questionable|Doubtful|Probable|Available)\b",
        r"(\p{Lu}[\p{L}'.\-]*(?:\s\p{Lu}[\p{L}'.\-]*)*(?:\s(?:Jr|Sr|II|III|IV)\.?)?),\s*(\p{Lu}[\p{L}'.\-]*(?:\s\p{Lu}[\p{L}'.\-]*)?(?:\s(?:Jr|Sr|II|III|IV)\.?)?)\s+(Out|Questionable|Doubtful|Probable|Available)\b",
        r"(\p{L}[\p{L}'.\-]*),(\p{L}[\p{L}'.\-]*)\s*(Out|Questionable|Doubtful|Probable|Available)\b",
        r"(\p{L}[\p{L}'.\-\s]*?)\s*,\s*(\p{L}[\p{L}'.\-\s]*?)\s+(Out|Questionable|Doubtful|Probable|Available)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// The whole text before a status word when it is nothing but a name:
/// `Last[-extra words], First[-extra words][ Suffix]`.
pub static ANCHORED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\p{Lu}[\p{L}'.\-]*(?:[\s\-]\p{Lu}[\p{L}'.\-]*)*,\s*\p{Lu}[\p{L}'.\-]*(?:[\s\-]\p{Lu}[\p{L}'.\-]*)*(?:\s(?:Jr\.?|Sr\.?|II|III|IV))?$",
    )
    .expect("valid regex")
});

/// Text that reads as the start of another `Last, First` entry.
pub static NAME_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{Lu}[\p{L}'.\-]*(?:\s\p{Lu}[\p{L}'.\-]*)?,\s*\p{Lu}[\p{L}'.\-]+")
        .expect("valid regex")
});

/// Standalone three-letter team codes and matchup pairs inside a name.
pub static TEAM_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let codes: Vec<&str> = TEAMS.iter().map(|(_, code)| *code).collect();
    Regex::new(&format!(
        r"\b(?:[A-Z]{{3}}@[A-Z]{{3}}|{})\b",
        codes.join("|")
    ))
    .expect("valid regex")
});

/// Any full team name, ignoring case.
pub static TEAM_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<String> = TEAMS.iter().map(|(name, _)| regex::escape(name)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", names.join("|"))).expect("valid regex")
});

/// `Injury/Illness` lines whose tail looks cut off at a line break.
pub static INCOMPLETE_INJURY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r";\s*\p{Lu}\p{Ll}+$", r";\s*\p{Lu}\p{Ll}+\s\p{Lu}\p{Ll}+$"]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

/// Inline reasons with a known truncation shape that are worth
/// completing from the following lines.
pub static INCOMPLETE_REASON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Bilateral Low Back;?$",
        r"Injury/Illness - [^;]+;$",
        r";\s*(?:Left|Right|Bilateral)$",
        r"\bNon-$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Word fragments restored after the report layout chopped them.
pub static TRUNCATION_FIXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bSpams\b", "Spasms"),
        (r"\bSpasm$", "Spasms"),
        (r"\bNon-$", "Non-displaced Fracture"),
        (r"\bReconditio$", "Reconditioning"),
        (r"\bReturn to Competition$", "Return to Competition Reconditioning"),
        (r"\bTendinopath$", "Tendinopathy"),
        (r"\bInflammatio$", "Inflammation"),
        (r"\bProtoco$", "Protocol"),
        (r"\bSurger$", "Surgery"),
        (r"\bFractur$", "Fracture"),
        (r"\bContusio$", "Contusion"),
        (r"\bSorenes$", "Soreness"),
        (r"\bManagemen$", "Management"),
        (r"\bStrai$", "Strain"),
    ]
    .iter()
    .map(|(p, r)| (Regex::new(p).expect("valid regex"), *r))
    .collect()
});

/// Reason shapes that usually mean the text was cut short.
pub static TRUNCATED_REASON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r";$",
        r"-$",
        r"\b(?:Left|Right|Bilateral|Low|Upper|Lower)$",
        r";\s*[A-Za-z]{1,3}$",
        r"\b(?:Non|Partial|Return to)$",
        r"^Injury/Illness - [^;]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Reason shapes of a complete, well-formed description.
pub static COMPLETE_REASON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^Injury/Illness - [\p{L}][\p{L} /'\-]*; [\p{L}][\p{L} /'\-]+$",
        r"^G League - (?:Two-Way|On Assignment)",
        r"^(?:Personal Reasons|League Suspension|Not With Team|Concussion Protocol)$",
        r"^Health and Safety Protocols",
        r"(?:Injury Management|Return to Competition Reconditioning)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// `Injury/Illness - <where>; <what>` structure.
pub static STRUCTURED_REASON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Injury/Illness - [^;]+; .+").expect("valid regex"));

/// A compiled regex substitution applied during reason cleanup.
#[derive(Debug, Clone)]
pub struct TruncationFix {
    /// Fragment to look for.
    pub pattern: Regex,
    /// Replacement text (may use `$1`-style group references).
    pub replacement: String,
}

/// A team name paired with its code and a lowercase copy for matching.
#[derive(Debug, Clone)]
pub struct Team {
    /// Display name (e.g. `"Miami Heat"`).
    pub name: &'static str,
    /// Lowercased name.
    pub lower: String,
    /// Three-letter code.
    pub code: &'static str,
}

/// The effective vocabulary of one parser instance: the built-in tables
/// plus whatever a [`ParserConfig`] adds.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    teams: Vec<Team>,
    medical_terms: Vec<String>,
    truncation_fixes: Vec<TruncationFix>,
}

impl Vocabulary {
    /// Builds the vocabulary for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidPattern`] if a configured truncation
    /// fix is not a valid regex.
    pub fn new(config: &ParserConfig) -> Result<Self, ParseError> {
        let teams = TEAMS
            .iter()
            .map(|(name, code)| Team {
                name,
                lower: name.to_lowercase(),
                code,
            })
            .collect();

        let mut medical_terms: Vec<String> =
            MEDICAL_TERMS.iter().map(|t| (*t).to_string()).collect();
        for extra in &config.extra_medical_terms {
            let term = extra.trim().to_lowercase();
            if !term.is_empty() && !medical_terms.contains(&term) {
                medical_terms.push(term);
            }
        }

        let mut truncation_fixes: Vec<TruncationFix> = TRUNCATION_FIXES
            .iter()
            .map(|(pattern, replacement)| TruncationFix {
                pattern: pattern.clone(),
                replacement: (*replacement).to_string(),
            })
            .collect();
        for extra in &config.extra_truncation_fixes {
            truncation_fixes.push(TruncationFix {
                pattern: Regex::new(&extra.pattern)?,
                replacement: extra.replacement.clone(),
            });
        }

        Ok(Self {
            teams,
            medical_terms,
            truncation_fixes,
        })
    }

    /// Team table in report order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Medical vocabulary, lowercase.
    #[must_use]
    pub fn medical_terms(&self) -> &[String] {
        &self.medical_terms
    }

    /// Truncation fixes in application order.
    #[must_use]
    pub fn truncation_fixes(&self) -> &[TruncationFix] {
        &self.truncation_fixes
    }

    /// Looks up the code for a team name, ignoring case.
    #[must_use]
    pub fn team_code(&self, name: &str) -> Option<&'static str> {
        let lower = name.to_lowercase();
        self.teams.iter().find(|t| t.lower == lower).map(|t| t.code)
    }

    /// Returns `true` if `text` mentions any medical term.
    #[must_use]
    pub fn has_medical_term(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.medical_terms.iter().any(|t| lower.contains(t.as_str()))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(&ParserConfig::default()).unwrap_or_else(|_| unreachable!())
    }
}

/// Returns `true` if `lower` (already lowercased) contains any of `terms`.
#[must_use]
pub fn contains_any(lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lower.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TruncationFixConfig;

    #[test]
    fn team_table_has_thirty_unique_codes() {
        let mut codes: Vec<&str> = TEAMS.iter().map(|(_, c)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 30);
        assert!(codes.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn all_static_patterns_compile() {
        assert_eq!(PLAYER_PATTERNS.len(), 4);
        assert!(!INCOMPLETE_INJURY_PATTERNS.is_empty());
        assert!(!INCOMPLETE_REASON_PATTERNS.is_empty());
        assert!(!TRUNCATION_FIXES.is_empty());
        assert!(!TRUNCATED_REASON_PATTERNS.is_empty());
        assert!(!COMPLETE_REASON_PATTERNS.is_empty());
        assert!(TEAM_CODE_RE.is_match("MIA"));
        assert!(TEAM_CODE_RE.is_match("LAL@BOS"));
    }

    #[test]
    fn config_extends_vocabulary() {
        let config = ParserConfig {
            extra_medical_terms: vec!["  Turf Toe ".to_string(), "sprain".to_string()],
            extra_truncation_fixes: vec![TruncationFixConfig {
                pattern: r"\bHamstrin$".to_string(),
                replacement: "Hamstring".to_string(),
            }],
            ..ParserConfig::default()
        };
        let vocab = Vocabulary::new(&config).unwrap();
        assert_eq!(vocab.medical_terms().len(), MEDICAL_TERMS.len() + 1);
        assert!(vocab.has_medical_term("Left Turf Toe"));
        assert_eq!(vocab.truncation_fixes().len(), TRUNCATION_FIXES.len() + 1);
    }

    #[test]
    fn invalid_configured_pattern_is_rejected() {
        let config = ParserConfig {
            extra_truncation_fixes: vec![TruncationFixConfig {
                pattern: "(unclosed".to_string(),
                replacement: String::new(),
            }],
            ..ParserConfig::default()
        };
        assert!(matches!(
            Vocabulary::new(&config),
            Err(ParseError::InvalidPattern(_))
        ));
    }
}
