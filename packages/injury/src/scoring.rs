//! Reason cleanup and confidence scoring.

use std::sync::LazyLock;

use regex::Regex;

use crate::detect::starts_with_reason_prefix;
use crate::tables::{
    COMPLETE_REASON_PATTERNS, DETAILED_TERMS, GENERIC_REASONS, INJURY_PREFIX, LEADING_STATUS_RE,
    STRUCTURED_REASON_RE, TRUNCATED_REASON_PATTERNS, Vocabulary, contains_any,
};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A semicolon with any surrounding whitespace or repeated semicolons.
static SEMICOLON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*;[\s;]*").expect("valid regex"));

/// Normalizes raw reason text.
///
/// Strips leading status words, repairs truncated words, normalizes
/// whitespace and `;` separators, and labels bare medical descriptions
/// with the `Injury/Illness - ` prefix.
#[must_use]
pub fn clean_reason(raw: &str, vocab: &Vocabulary) -> String {
    let mut text = LEADING_STATUS_RE.replace(raw.trim(), "").trim().to_string();

    for fix in vocab.truncation_fixes() {
        text = fix
            .pattern
            .replace_all(&text, fix.replacement.as_str())
            .into_owned();
    }

    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = SEMICOLON_RE.replace_all(&text, "; ");
    let text = text.trim_matches(|c: char| c == ';' || c.is_whitespace());

    if !text.is_empty() && !starts_with_reason_prefix(text) && vocab.has_medical_term(text) {
        return format!("{INJURY_PREFIX} - {text}");
    }

    text.to_string()
}

/// Scores how trustworthy a cleaned reason looks, from 0.0 to 1.0 in
/// steps of 0.1.
///
/// Short, generic, and truncated-looking reasons lose points; complete
/// `Injury/Illness - <where>; <what>` descriptions with a specific
/// diagnosis gain them. An empty reason scores 0.0.
#[must_use]
pub fn calculate_confidence(reason: &str) -> f64 {
    if reason.is_empty() {
        return 0.0;
    }

    let mut score = 1.0_f64;

    let len = reason.chars().count();
    if len < 5 {
        score -= 0.5;
    } else if len < 15 {
        score -= 0.3;
    } else if len < 25 {
        score -= 0.1;
    }

    let lower = reason.to_lowercase();

    if GENERIC_REASONS.contains(&lower.as_str()) {
        score -= 0.4;
    }
    if TRUNCATED_REASON_PATTERNS.iter().any(|re| re.is_match(reason)) {
        score -= 0.3;
    }
    if COMPLETE_REASON_PATTERNS.iter().any(|re| re.is_match(reason)) {
        score += 0.2;
    }
    if STRUCTURED_REASON_RE.is_match(reason) {
        score += 0.1;
    }
    if contains_any(&lower, DETAILED_TERMS) {
        score += 0.1;
    }

    (score.clamp(0.0, 1.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> String {
        clean_reason(raw, &Vocabulary::default())
    }

    #[test]
    fn cleanup_normalizes_separators() {
        assert_eq!(
            clean("  Injury/Illness -  Left Knee ;Sprain;; "),
            "Injury/Illness - Left Knee; Sprain"
        );
    }

    #[test]
    fn cleanup_strips_leading_status() {
        assert_eq!(clean("Out Out G League - Two-Way"), "G League - Two-Way");
    }

    #[test]
    fn cleanup_repairs_truncated_words() {
        assert_eq!(
            clean("Injury/Illness - Low Back; Spams"),
            "Injury/Illness - Low Back; Spasms"
        );
        assert_eq!(
            clean("Injury/Illness - Left Knee; Return to Competition"),
            "Injury/Illness - Left Knee; Return to Competition Reconditioning"
        );
        assert_eq!(
            clean("Injury/Illness - Right Hand; Non-"),
            "Injury/Illness - Right Hand; Non-displaced Fracture"
        );
    }

    #[test]
    fn cleanup_labels_bare_medical_text() {
        assert_eq!(clean("Left Ankle Sprain"), "Injury/Illness - Left Ankle Sprain");
        assert_eq!(clean("Personal Reasons"), "Personal Reasons");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn confidence_rewards_complete_reasons() {
        assert!((calculate_confidence("Injury/Illness - Left Knee; Sprain") - 1.0).abs() < 1e-9);
        assert!((calculate_confidence("G League - Two-Way") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_penalizes_weak_reasons() {
        assert!((calculate_confidence("Rest") - 0.1).abs() < 1e-9);
        assert!((calculate_confidence("Personal") - 0.3).abs() < 1e-9);
        assert!((calculate_confidence("Injury/Illness - Left Ankle") - 0.7).abs() < 1e-9);
        assert!((calculate_confidence("Injury/Illness - Sprain") - 0.7).abs() < 1e-9);
    }

    #[test]
    fn empty_reason_scores_zero() {
        assert!(calculate_confidence("").abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_is_always_in_range_and_rounded() {
        for reason in [
            "x",
            "Out",
            "Injury/Illness - Left",
            "Injury/Illness - Right Knee; Sprain Return to Competition Reconditioning",
            "Not With Team",
            "Injury/Illness - Low Back;",
        ] {
            let score = calculate_confidence(reason);
            assert!((0.0..=1.0).contains(&score), "{reason}: {score}");
            assert!(((score * 10.0).round() - score * 10.0).abs() < 1e-9, "{reason}: {score}");
        }
    }
}
