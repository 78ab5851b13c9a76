//! Error types for launchboard-core
//!
//! Backend failures are typed with thiserror; the ingestion path degrades
//! gracefully through a FetchReport instead of propagating.

use thiserror::Error;

/// Boxed source for backend-specific failures behind the trait seam
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a signup backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("page query failed: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("subscription setup failed: {message}")]
    Subscribe {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("malformed row: {message}")]
    MalformedRow { message: String },
}

impl BackendError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            source: None,
        }
    }

    pub fn query_with(message: impl Into<String>, source: BoxedSource) -> Self {
        Self::Query {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn subscribe(message: impl Into<String>) -> Self {
        Self::Subscribe {
            message: message.into(),
            source: None,
        }
    }
}

/// Outcome of one pagination pass
///
/// Tracks partial failures so a page error yields whatever rows were
/// already collected rather than discarding the cycle.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Pages successfully fetched
    pub pages_fetched: usize,
    /// Rows collected across all pages
    pub rows_fetched: usize,
    /// A page error halted pagination early
    pub partial: bool,
    /// The page-count safety cap aborted the loop
    pub truncated: bool,
    /// Error messages recorded along the way
    pub errors: Vec<String>,
}

impl FetchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.partial = true;
        self.errors.push(message.into());
    }

    /// True when the pass completed without error or truncation
    pub fn is_clean(&self) -> bool {
        !self.partial && !self.truncated && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_starts_clean() {
        let report = FetchReport::new();
        assert!(report.is_clean());
        assert_eq!(report.pages_fetched, 0);
    }

    #[test]
    fn test_record_error_marks_partial() {
        let mut report = FetchReport::new();
        report.record_error("connection reset");

        assert!(report.partial);
        assert!(!report.is_clean());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_truncated_is_not_clean() {
        let report = FetchReport {
            truncated: true,
            ..Default::default()
        };
        assert!(!report.is_clean());
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::query("timeout");
        assert_eq!(err.to_string(), "page query failed: timeout");
    }
}
