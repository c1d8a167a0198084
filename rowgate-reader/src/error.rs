use rowgate_datatype::ScanError;
use rowgate_source::error::Error as SourceError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Failed to open result stream: {0}")]
    SourceOpen(SourceError),
    #[error("Failed to pull row after {rows_delivered} rows: {source}")]
    Pull {
        rows_delivered: u64,
        source: SourceError,
    },
    #[error("Read canceled after {rows_delivered} rows")]
    Canceled { rows_delivered: u64 },
    #[error("Failed to scan row {row}: {error}")]
    Scan { row: u64, error: ScanError },
    #[error("Reader closed after {rows_delivered} rows")]
    Closed { rows_delivered: u64 },
    #[error("Read incomplete after {rows_delivered} rows")]
    Incomplete { rows_delivered: u64 },
}

impl Error {
    /// Number of rows delivered to the caller when the error was raised.
    #[inline]
    pub fn rows_delivered(&self) -> u64 {
        match self {
            Error::SourceOpen(_) => 0,
            Error::Scan { row, .. } => *row,
            Error::Pull { rows_delivered, .. }
            | Error::Canceled { rows_delivered }
            | Error::Closed { rows_delivered }
            | Error::Incomplete { rows_delivered } => *rows_delivered,
        }
    }

    #[inline]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled { .. })
    }
}
