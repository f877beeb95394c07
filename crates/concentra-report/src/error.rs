//! Error types for report rendering.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("I/O: {0}")] Io(String),
    #[error("table row has {got} cells, header has {expected}")] ColumnMismatch { expected: usize, got: usize },
    #[error("row written before a table header")] NoTable,
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError::Io(e.to_string())
    }
}
