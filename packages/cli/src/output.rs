//! Record rendering and output.

use std::path::Path;

use sports_etl_injury::PlayerRecord;

/// Output encoding for parsed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array.
    #[default]
    Json,
    /// CSV with a header row.
    Csv,
}

/// Errors while rendering or writing records.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders `records` in `format`.
///
/// # Errors
///
/// Returns [`OutputError`] if encoding fails.
pub fn render(records: &[PlayerRecord], format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            for record in records {
                wtr.serialize(record)?;
            }
            let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Writes `rendered` to `path`, or to stdout when no path is given.
///
/// # Errors
///
/// Returns [`OutputError::Io`] if the file cannot be written.
pub fn write(rendered: &str, path: Option<&Path>) -> Result<(), OutputError> {
    if let Some(path) = path {
        std::fs::write(path, rendered)?;
        log::info!("Wrote {}", path.display());
    } else {
        println!("{rendered}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sports_etl_injury::InjuryStatus;

    use super::*;

    fn record() -> PlayerRecord {
        PlayerRecord {
            date: "01/15/2025".to_string(),
            gametime: "07:30 (ET)".to_string(),
            matchup: "LAL@BOS".to_string(),
            team: "LAL".to_string(),
            player: "James, LeBron".to_string(),
            status: InjuryStatus::Questionable,
            reason: "Injury/Illness - Right Knee; Sprain".to_string(),
            confidence: 1.0,
        }
    }

    #[test]
    fn csv_has_eight_columns_and_quotes_commas() {
        let rendered = render(&[record()], OutputFormat::Csv).unwrap();
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some("date,gametime,matchup,team,player,status,reason,confidence")
        );
        assert_eq!(
            lines.next(),
            Some(
                "01/15/2025,07:30 (ET),LAL@BOS,LAL,\"James, LeBron\",Questionable,Injury/Illness - Right Knee; Sprain,1.0"
            )
        );
    }

    #[test]
    fn json_is_an_array_of_records() {
        let rendered = render(&[record()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value[0]["player"], "James, LeBron");
        assert_eq!(value[0]["status"], "Questionable");
    }

    #[test]
    fn empty_csv_is_empty() {
        assert_eq!(render(&[], OutputFormat::Csv).unwrap(), "");
    }
}
