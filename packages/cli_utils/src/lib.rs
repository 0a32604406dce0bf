#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the sports ETL toolchain.
//!
//! Provides `indicatif`-backed progress bars behind the [`ProgressCallback`]
//! trait, plus [`init_logger`] which sets up `indicatif-log-bridge` so that
//! `log::info!` and friends are suspended while progress bars redraw.

pub mod progress;

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;
pub use progress::{NullProgress, ProgressCallback, null_progress};

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// An `indicatif` [`ProgressBar`] that implements [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Creates a bar for a batch of files. The length is filled in by
    /// [`ProgressCallback::set_total`] once the batch is known.
    #[must_use]
    pub fn files_bar(multi: &MultiProgress, message: &str) -> Arc<Self> {
        let bar = multi.add(ProgressBar::new(0));
        bar.set_style(bar_style());
        bar.set_message(message.to_string());

        Arc::new(Self { bar })
    }

    /// Creates a spinner for a single step of unknown length (e.g. a
    /// download).
    #[must_use]
    pub fn spinner(multi: &MultiProgress, message: &str) -> Arc<Self> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        Arc::new(Self { bar })
    }
}

impl ProgressCallback for IndicatifProgress {
    /// Sets the length and restarts from zero. A spinner becomes a bar.
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(bar_style());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while progress bars redraw.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // already set (e.g. in tests)

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn files_bar_tracks_increments() {
        let multi = hidden();
        let progress = IndicatifProgress::files_bar(&multi, "Parsing");
        progress.set_total(3);
        progress.inc(1);
        progress.inc(1);
        progress.set_message("b.txt".to_string());
        assert_eq!(progress.bar.length(), Some(3));
        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bar.message(), "b.txt");
        progress.finish("done".to_string());
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn spinner_resets_on_total() {
        let multi = hidden();
        let progress = IndicatifProgress::spinner(&multi, "Downloading");
        progress.inc(5);
        progress.set_total(10);
        assert_eq!(progress.bar.position(), 0);
        assert_eq!(progress.bar.length(), Some(10));
    }

    #[test]
    fn null_progress_accepts_everything() {
        let progress = null_progress();
        progress.set_total(10);
        progress.inc(3);
        progress.set_message("ignored".to_string());
        progress.finish("ignored".to_string());
    }
}
