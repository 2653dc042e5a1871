//! Error types for template configuration and rendering.
//!
//! Every fallible operation in this crate returns [`TemplateError`]. Build-time
//! problems (the configuration family) are reported by
//! [`TemplateBuilder::build`](crate::TemplateBuilder::build); everything else
//! surfaces from the render calls.

use thiserror::Error;

/// Boxed error produced by a fallible column mapper or row source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when building or rendering a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The builder was asked to build without any column.
    #[error("configuration error: no columns defined")]
    NoColumns,

    /// The configured delimiter is the empty string.
    #[error("configuration error: delimiter must not be empty")]
    EmptyDelimiter,

    /// No projector was set and no identity projection was requested.
    #[error("configuration error: no projector specified")]
    NoProjector,

    /// The destination could not be opened, written, flushed or closed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fallible column mapper failed. `row` is zero-based.
    #[error("column '{column}' failed on row {row}: {source}")]
    Mapping {
        column: String,
        row: usize,
        #[source]
        source: BoxError,
    },

    /// The row source failed while producing row `row` (zero-based).
    #[error("row source failed at row {row}: {source}")]
    Projection {
        row: usize,
        #[source]
        source: BoxError,
    },

    /// A column mapper produced no string at all. `row` is zero-based.
    #[error("column '{column}' produced no value on row {row}")]
    NullValue { column: String, row: usize },

    /// Rendering stopped because the cancellation flag was raised.
    #[error("render cancelled after {rows_written} rows")]
    Cancelled { rows_written: usize },

    /// Template options could not be parsed.
    #[error("invalid template options: {0}")]
    Options(String),
}

impl TemplateError {
    /// Returns true for errors raised by [`TemplateBuilder::build`](crate::TemplateBuilder::build).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TemplateError::NoColumns | TemplateError::EmptyDelimiter | TemplateError::NoProjector
        )
    }
}

impl From<serde_yaml::Error> for TemplateError {
    fn from(err: serde_yaml::Error) -> Self {
        TemplateError::Options(err.to_string())
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Options(err.to_string())
    }
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_grouped() {
        assert!(TemplateError::NoColumns.is_configuration());
        assert!(TemplateError::EmptyDelimiter.is_configuration());
        assert!(TemplateError::NoProjector.is_configuration());
        assert!(!TemplateError::Cancelled { rows_written: 3 }.is_configuration());
    }

    #[test]
    fn display_names_column_and_row() {
        let err = TemplateError::NullValue {
            column: "Name".to_string(),
            row: 4,
        };
        assert_eq!(err.to_string(), "column 'Name' produced no value on row 4");
        assert!(TemplateError::NoColumns
            .to_string()
            .contains("no columns defined"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing directory");
        let err: TemplateError = io_err.into();
        assert!(matches!(err, TemplateError::Io(_)));
    }

    #[test]
    fn mapping_error_keeps_source() {
        use std::error::Error as _;

        let err = TemplateError::Mapping {
            column: "Id".to_string(),
            row: 0,
            source: "not a number".into(),
        };
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("not a number"));
    }

    #[test]
    fn projection_error_keeps_source_and_row() {
        use std::error::Error as _;

        let err = TemplateError::Projection {
            row: 2,
            source: "cursor closed".into(),
        };
        assert_eq!(err.to_string(), "row source failed at row 2: cursor closed");
        assert!(err.source().is_some());
        assert!(!err.is_configuration());
    }
}
