//! Injury report downloads.
//!
//! Reports are published as one PDF per hourly slot, named after the
//! slot's date and 12-hour clock time.

use std::time::Duration;

use chrono::NaiveDate;

use crate::{PdfError, extract_text, retry};

/// Directory the league serves injury report PDFs from.
pub const REPORT_BASE_URL: &str = "https://ak-static.cms.nba.com/referee/injury";

/// Per-request timeout for report downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("sports_etl/", env!("CARGO_PKG_VERSION"));

/// Builds the PDF URL of the report published at `hour` (0-23, Eastern)
/// on `date`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use sports_etl_pdf::download::report_url;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
/// assert_eq!(
///     report_url(date, 17).unwrap(),
///     "https://ak-static.cms.nba.com/referee/injury/Injury-Report_2025-01-15_05PM.pdf",
/// );
/// ```
///
/// # Errors
///
/// Returns [`PdfError::InvalidHour`] if `hour` is greater than 23.
pub fn report_url(date: NaiveDate, hour: u32) -> Result<String, PdfError> {
    if hour > 23 {
        return Err(PdfError::InvalidHour(hour));
    }

    let (clock_hour, meridiem) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };

    Ok(format!(
        "{REPORT_BASE_URL}/Injury-Report_{}_{clock_hour:02}{meridiem}.pdf",
        date.format("%Y-%m-%d")
    ))
}

/// Builds the HTTP client used for report downloads.
///
/// # Errors
///
/// Returns [`PdfError::Http`] if the client cannot be constructed.
pub fn build_client() -> Result<reqwest::Client, PdfError> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Downloads the PDF at `url`, retrying transient failures.
///
/// # Errors
///
/// Returns [`PdfError`] if the download fails after all retries or the
/// response is not a PDF.
pub async fn download_pdf(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, PdfError> {
    log::info!("Downloading {url}");
    let bytes = retry::send_bytes(|| client.get(url)).await?;

    if !crate::is_pdf(&bytes) {
        return Err(PdfError::Extraction(format!(
            "{url} returned {} bytes that are not a PDF",
            bytes.len()
        )));
    }

    Ok(bytes)
}

/// Downloads the report for one slot and extracts its text.
///
/// Extraction runs on a blocking thread.
///
/// # Errors
///
/// Returns [`PdfError`] if the slot is invalid, the download fails, or
/// the PDF cannot be read.
pub async fn fetch_report_text(
    client: &reqwest::Client,
    date: NaiveDate,
    hour: u32,
) -> Result<String, PdfError> {
    let url = report_url(date, hour)?;
    let bytes = download_pdf(client, &url).await?;

    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| PdfError::Extraction(format!("extraction task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
    }

    #[test]
    fn uses_twelve_hour_clock() {
        let cases = [
            (0, "12AM"),
            (1, "01AM"),
            (11, "11AM"),
            (12, "12PM"),
            (13, "01PM"),
            (23, "11PM"),
        ];
        for (hour, suffix) in cases {
            assert_eq!(
                report_url(date(), hour).unwrap(),
                format!("{REPORT_BASE_URL}/Injury-Report_2025-03-02_{suffix}.pdf"),
            );
        }
    }

    #[test]
    fn rejects_out_of_range_hours() {
        assert!(matches!(
            report_url(date(), 24),
            Err(PdfError::InvalidHour(24))
        ));
    }
}
