//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of repeated errors at the same location
//! - Position-sorted `flush()`

use okl_ir::Span;

use crate::{Diagnostic, ErrorCode};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Deduplicate diagnostics with the same location and code.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// This is the sink the export engine reports into. Rejections never abort
/// the unit; the caller checks [`DiagnosticQueue::has_errors`] after all
/// declarations were processed.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    /// Last (span start, code) seen, for dedup.
    last_error: Option<(u32, ErrorCode)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was
    /// filtered by the error limit or deduplication.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.limit_reached() && diag.is_error() {
            return false;
        }

        let start = diag.primary_span().unwrap_or(Span::DUMMY).start;

        if self.config.deduplicate
            && diag.is_error()
            && self.last_error == Some((start, diag.code))
        {
            return false;
        }

        if diag.is_error() {
            self.last_error = Some((start, diag.code));
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Check if any errors were recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    ///
    /// Skips sorting when already in order (the common case for a single
    /// top-to-bottom pass).
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let key = |d: &Diagnostic| d.primary_span().unwrap_or(Span::DUMMY).start;

        let already_sorted = self.diagnostics.windows(2).all(|w| key(&w[0]) <= key(&w[1]));
        if !already_sorted {
            self.diagnostics.sort_by_key(key);
        }

        self.error_count = 0;
        self.last_error = None;
        std::mem::take(&mut self.diagnostics)
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001)
        .with_message(format!("aborting due to {limit} previous errors"))
        .with_label(span, "error limit reached here")
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn err_at(start: u32, code: ErrorCode) -> Diagnostic {
        Diagnostic::error(code)
            .with_message("boom")
            .with_label(Span::new(start, start + 1), "here")
    }

    #[test]
    fn counts_and_flushes_sorted() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        queue.add(err_at(9, ErrorCode::E2001));
        queue.add(err_at(2, ErrorCode::E2004));
        assert_eq!(queue.error_count(), 2);
        assert!(queue.has_errors());

        let flushed = queue.flush();
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].primary_span().unwrap().start, 2);
        assert!(!queue.has_errors());
    }

    #[test]
    fn dedups_same_location_and_code() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.add(err_at(5, ErrorCode::E2006)));
        assert!(!queue.add(err_at(5, ErrorCode::E2006)));
        assert!(queue.add(err_at(5, ErrorCode::E2007)));
        assert_eq!(queue.error_count(), 2);
    }

    #[test]
    fn error_limit_stops_recording() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
            error_limit: 2,
            deduplicate: false,
        });
        assert!(queue.add(err_at(1, ErrorCode::E2001)));
        assert!(queue.add(err_at(2, ErrorCode::E2001)));
        assert!(queue.limit_reached());
        assert!(!queue.add(err_at(3, ErrorCode::E2001)));
        queue.add(too_many_errors(2, Span::new(3, 4)));
        assert_eq!(queue.error_count(), 2);
    }
}
