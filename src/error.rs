//! Error types for Tableau extraction
//!
//! Library functions return [`eyre::Result`]; failures that callers may want
//! to tell apart are raised as a [`TableauError`] inside the report and can be
//! recovered with `report.downcast_ref::<TableauError>()`.

use thiserror::Error;

/// Failures surfaced to the host pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableauError {
    /// Sign-in request failed or its response lacked the expected credentials
    #[error("Tableau authentication failed: {0}")]
    Authentication(String),

    /// Metadata API request failed or its response lacked a `data` field
    #[error("Tableau metadata query failed: {0}")]
    Query(String),

    /// A required configuration value is absent or invalid
    #[error("Tableau configuration error: {0}")]
    Configuration(String),
}

impl TableauError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Find a [`TableauError`] anywhere in a report's chain
pub fn find_tableau_error(report: &eyre::Report) -> Option<&TableauError> {
    report
        .chain()
        .find_map(|cause| cause.downcast_ref::<TableauError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn test_display() {
        let err = TableauError::Query("no data".to_string());
        assert_eq!(err.to_string(), "Tableau metadata query failed: no data");
    }

    #[test]
    fn test_find_through_context() {
        let report: eyre::Result<()> = Err(TableauError::Authentication("401".to_string()).into());
        let report = report.wrap_err("while extracting").unwrap_err();

        let found = find_tableau_error(&report).unwrap();
        assert!(found.is_authentication());
        assert!(!found.is_query());
    }
}
