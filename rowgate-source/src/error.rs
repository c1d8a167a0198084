use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Query target '{0}' not found")]
    QueryNotFound(String),
    #[error("Query canceled before open")]
    Canceled,
    #[error("Injected fault at row {row}")]
    Fault { row: u64 },
    #[error("Stream already released")]
    StreamReleased,
    #[error("Stream gate closed")]
    GateClosed,
}
