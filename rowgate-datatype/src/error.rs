use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Failure to convert fields of a row into typed values.
/// Column indexes are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Column {0} out of range")]
    ColumnOutOfRange(usize),
    #[error("Column {0} is NULL")]
    NullValue(usize),
    #[error("Column {column} is {found}, expected {expected}")]
    TypeMismatch {
        column: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Column {0} value out of range of target type")]
    Overflow(usize),
    #[error("Row has {found} columns, expected {expected}")]
    ArityMismatch { expected: usize, found: usize },
}

impl ScanError {
    /// Column the error refers to, if any.
    #[inline]
    pub fn column(&self) -> Option<usize> {
        match self {
            ScanError::ColumnOutOfRange(c) | ScanError::NullValue(c) | ScanError::Overflow(c) => {
                Some(*c)
            }
            ScanError::TypeMismatch { column, .. } => Some(*column),
            ScanError::ArityMismatch { .. } => None,
        }
    }
}
