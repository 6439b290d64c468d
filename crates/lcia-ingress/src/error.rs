//! Error types for workbook ingress
//!
//! Provides error handling for:
//! - Opening and reading workbooks
//! - Schema checks (sheets, columns, required values)

use std::path::PathBuf;

/// Workbook content does not match the expected layout
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// Required sheet is absent
    #[error("missing sheet '{sheet}' (available: {available:?})")]
    MissingSheet {
        /// Sheet looked for
        sheet: String,
        /// Sheets the workbook does have
        available: Vec<String>,
    },

    /// Required column is absent from the header row
    #[error("sheet '{sheet}' has no column '{column}'")]
    MissingColumn {
        /// Sheet name
        sheet: String,
        /// Header looked for
        column: String,
    },

    /// Required cell is empty
    #[error("sheet '{sheet}' row {row}: '{column}' is empty")]
    MissingValue {
        /// Sheet name
        sheet: String,
        /// 1-based spreadsheet row
        row: usize,
        /// Column header
        column: String,
    },

    /// Cell is not a number
    #[error("sheet '{sheet}' row {row}: '{column}' is not a number: '{value}'")]
    InvalidNumber {
        /// Sheet name
        sheet: String,
        /// 1-based spreadsheet row
        row: usize,
        /// Column header
        column: String,
        /// Cell contents as text
        value: String,
    },
}

/// Errors while reading a workbook
#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    /// Layout mismatch
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Workbook could not be opened
    #[error("cannot open workbook {path}: {source}")]
    Open {
        /// Workbook path
        path: PathBuf,
        /// Decoder error
        #[source]
        source: calamine::Error,
    },

    /// Sheet could not be decoded
    #[error("cannot read sheet '{sheet}': {source}")]
    Read {
        /// Sheet name
        sheet: String,
        /// Decoder error
        #[source]
        source: calamine::Error,
    },
}

impl IngressError {
    /// Whether the workbook was readable but laid out wrongly
    #[inline]
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// Result type alias for ingress operations
pub type IngressResult<T> = Result<T, IngressError>;
