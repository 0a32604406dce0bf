//! Diagnostics side-channel for parse outcomes.
//!
//! Defines a [`Notifier`] trait that decouples the parser from whatever
//! alerting backend a deployment uses. The parser always logs its
//! diagnostics through `log`; a notifier is an additional destination,
//! and a failing notifier never affects parse results.

use std::sync::{Arc, Mutex};

/// Structured details attached to a diagnostic.
pub type Details = serde_json::Map<String, serde_json::Value>;

/// Error returned by a [`Notifier`] that could not deliver a diagnostic.
#[derive(Debug, thiserror::Error)]
#[error("notification failed: {message}")]
pub struct NotifyError {
    /// Description of what went wrong.
    pub message: String,
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Routine summary.
    Info,
    /// Suspicious but non-fatal outcome.
    Warning,
    /// Parse failure.
    Error,
}

/// Receiver for parser diagnostics.
///
/// Implementations must be `Send + Sync` so one notifier can be shared by
/// many parser instances across threads.
pub trait Notifier: Send + Sync {
    /// Reports a routine outcome.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the diagnostic could not be delivered.
    fn info(&self, title: &str, message: &str, details: &Details) -> Result<(), NotifyError>;

    /// Reports a suspicious outcome.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the diagnostic could not be delivered.
    fn warning(&self, title: &str, message: &str, details: &Details) -> Result<(), NotifyError>;

    /// Reports a failed parse.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the diagnostic could not be delivered.
    fn error(&self, title: &str, message: &str, details: &Details) -> Result<(), NotifyError>;
}

/// A [`Notifier`] that discards everything.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn info(&self, _title: &str, _message: &str, _details: &Details) -> Result<(), NotifyError> {
        Ok(())
    }

    fn warning(&self, _title: &str, _message: &str, _details: &Details) -> Result<(), NotifyError> {
        Ok(())
    }

    fn error(&self, _title: &str, _message: &str, _details: &Details) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Returns a shared [`NullNotifier`].
#[must_use]
pub fn null_notifier() -> Arc<dyn Notifier> {
    Arc::new(NullNotifier)
}

/// A diagnostic captured by [`MemoryNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity it was reported with.
    pub severity: Severity,
    /// Short title.
    pub title: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details.
    pub details: Details,
}

/// A [`Notifier`] that keeps every diagnostic in memory, for callers that
/// want to inspect or print them after a batch of parses.
#[derive(Default)]
pub struct MemoryNotifier {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything captured so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    fn push(
        &self,
        severity: Severity,
        title: &str,
        message: &str,
        details: &Details,
    ) -> Result<(), NotifyError> {
        let mut guard = self.diagnostics.lock().map_err(|e| NotifyError {
            message: format!("diagnostics buffer poisoned: {e}"),
        })?;
        guard.push(Diagnostic {
            severity,
            title: title.to_string(),
            message: message.to_string(),
            details: details.clone(),
        });
        Ok(())
    }
}

impl Notifier for MemoryNotifier {
    fn info(&self, title: &str, message: &str, details: &Details) -> Result<(), NotifyError> {
        self.push(Severity::Info, title, message, details)
    }

    fn warning(&self, title: &str, message: &str, details: &Details) -> Result<(), NotifyError> {
        self.push(Severity::Warning, title, message, details)
    }

    fn error(&self, title: &str, message: &str, details: &Details) -> Result<(), NotifyError> {
        self.push(Severity::Error, title, message, details)
    }
}

/// Logs a diagnostic locally, then forwards it to `notifier`. Delivery
/// failures are logged and swallowed.
pub fn dispatch(
    notifier: &dyn Notifier,
    severity: Severity,
    title: &str,
    message: &str,
    details: &Details,
) {
    let rendered = serde_json::Value::Object(details.clone());
    let result = match severity {
        Severity::Info => {
            log::info!("{title}: {message} {rendered}");
            notifier.info(title, message, details)
        }
        Severity::Warning => {
            log::warn!("{title}: {message} {rendered}");
            notifier.warning(title, message, details)
        }
        Severity::Error => {
            log::error!("{title}: {message} {rendered}");
            notifier.error(title, message, details)
        }
    };

    if let Err(e) = result {
        log::warn!("Diagnostics delivery for '{title}' failed: {e}");
    }
}
