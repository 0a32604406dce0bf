//! Parser configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at
//! all) yields the stock parser. A typical override file:
//!
//! ```toml
//! low_confidence_ratio = 0.25
//! extra_medical_terms = ["turf toe"]
//!
//! [[extra_truncation_fixes]]
//! pattern = '\bHamstrin$'
//! replacement = "Hamstring"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::ParseError;

/// Environment variable consulted for a config file path.
pub const CONFIG_ENV_VAR: &str = "INJURY_PARSER_CONFIG";

/// Tunables for an [`crate::InjuryReportParser`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Inputs shorter than this many characters are rejected.
    pub min_text_length: usize,
    /// Records scoring below this are "low confidence".
    pub low_confidence_threshold: f64,
    /// Share of low-confidence records above which a parse is flagged.
    pub low_confidence_ratio: f64,
    /// Maximum unparsed lines kept as samples.
    pub max_unparsed_samples: usize,
    /// Medical terms added to the built-in vocabulary.
    pub extra_medical_terms: Vec<String>,
    /// Regex substitutions applied after the built-in truncation fixes.
    pub extra_truncation_fixes: Vec<TruncationFixConfig>,
}

/// One configured truncation fix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TruncationFixConfig {
    /// Regex matched against the reason text.
    pub pattern: String,
    /// Replacement text.
    pub replacement: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_text_length: 100,
            low_confidence_threshold: 0.5,
            low_confidence_ratio: 0.3,
            max_unparsed_samples: 10,
            extra_medical_terms: Vec::new(),
            extra_truncation_fixes: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Config`] if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ParseError> {
        toml::de::from_str(toml_str).map_err(|e| ParseError::Config(e.to_string()))
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if the file cannot be read, or
    /// [`ParseError::Config`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded parser config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Loads the config named by `path`, falling back to the
    /// [`CONFIG_ENV_VAR`] environment variable, then to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file cannot be read or parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ParseError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(env_path) if !env_path.trim().is_empty() => Self::load(Path::new(env_path.trim())),
            _ => Ok(Self::default()),
        }
    }
}
