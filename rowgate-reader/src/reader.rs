use crate::config::{CancelPolicy, ReaderConfig};
use crate::error::{Error, Result};
use rowgate_datatype::{FromRow, Row};
use rowgate_runtime::{Cancellable, CancellationSignal};
use rowgate_source::{DataSource, ResultStream};
use std::fmt;

/// Observable state of a read session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Open,
    Canceled,
    Exhausted,
    Failed,
}

/// Outcome of a read that consumed the whole stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    pub rows_delivered: u64,
    pub scan_errors: u64,
}

impl fmt::Display for ReadSummary {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows delivered, {} scan errors",
            self.rows_delivered, self.scan_errors
        )
    }
}

// Failed keeps the error that ended the session, so it can be
// handed out again by later calls and by final_status().
#[derive(Debug)]
enum Phase {
    Open,
    Canceled,
    Exhausted,
    Failed(Error),
}

/// StreamingRowReader pulls rows from a result stream one call at a time
/// and stops deterministically once the cancellation signal is observed.
///
/// The signal is checked at every call boundary, before any pull is issued.
/// A cancel that happens before `next()` is entered is therefore always
/// observed by that call. A cancel that fires while a pull is in flight is
/// handled according to [`CancelPolicy`].
///
/// The reader owns the stream exclusively. `close()` releases it, and
/// dropping the reader closes it as well.
pub struct StreamingRowReader<S: ResultStream> {
    stream: Option<S>,
    signal: CancellationSignal,
    config: ReaderConfig,
    phase: Phase,
    rows_delivered: u64,
    scan_errors: u64,
    closed: bool,
}

impl<S: ResultStream> StreamingRowReader<S> {
    /// Open the query on given source.
    ///
    /// Opening never fails by itself. If the signal is already canceled the
    /// source is not contacted and the reader starts canceled. If the source
    /// fails to open the stream, the reader starts failed and its first
    /// `next()` returns the error.
    pub async fn open<D>(
        source: &D,
        conn: &D::Conn,
        query: &str,
        signal: CancellationSignal,
        config: ReaderConfig,
    ) -> Self
    where
        D: DataSource<Stream = S>,
    {
        let mut reader = StreamingRowReader {
            stream: None,
            signal,
            config,
            phase: Phase::Open,
            rows_delivered: 0,
            scan_errors: 0,
            closed: false,
        };
        if reader.signal.is_canceled() {
            reader.cancel();
            return reader;
        }
        let opened = match config.policy {
            CancelPolicy::FailFast => {
                let fut = source.open_query(conn, query, &reader.signal);
                let res = reader.signal.select_future(fut).await;
                match res {
                    Cancellable::Ready(res) => res,
                    Cancellable::Canceled => {
                        reader.cancel();
                        return reader;
                    }
                }
            }
            CancelPolicy::DrainThenStop => source.open_query(conn, query, &reader.signal).await,
        };
        match opened {
            Ok(stream) => {
                log::debug!("reader opened query '{}' with {:?}", query, config.policy);
                reader.stream = Some(stream);
            }
            Err(e) => {
                log::debug!("reader failed to open query '{}': {}", query, e);
                reader.fail(Error::SourceOpen(e));
            }
        }
        reader
    }

    /// Return next row, or `None` at end of stream.
    ///
    /// Once the reader leaves the open state, every further call returns
    /// the same terminal result without touching the stream.
    pub async fn next(&mut self) -> Result<Option<Row>> {
        if let Some(res) = self.settled() {
            return res;
        }
        if self.signal.is_canceled() {
            return Err(self.cancel());
        }
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => {
                return Err(Error::Closed {
                    rows_delivered: self.rows_delivered,
                })
            }
        };
        let pulled = match self.config.policy {
            CancelPolicy::FailFast => {
                let res = self.signal.select_future(stream.pull_next()).await;
                match res {
                    Cancellable::Ready(res) => res,
                    Cancellable::Canceled => return Err(self.cancel()),
                }
            }
            CancelPolicy::DrainThenStop => stream.pull_next().await,
        };
        match pulled {
            Ok(Some(row)) => {
                self.rows_delivered += 1;
                Ok(Some(row))
            }
            Ok(None) => {
                log::debug!(
                    "reader exhausted stream, {} rows delivered",
                    self.rows_delivered
                );
                self.phase = Phase::Exhausted;
                Ok(None)
            }
            Err(e) => Err(self.fail(Error::Pull {
                rows_delivered: self.rows_delivered,
                source: e,
            })),
        }
    }

    /// Return next row converted into `T`, or `None` at end of stream.
    ///
    /// A row that fails to convert still counts as delivered.
    pub async fn next_scan<T: FromRow>(&mut self) -> Result<Option<T>> {
        let row = match self.next().await? {
            Some(row) => row,
            None => return Ok(None),
        };
        match row.scan::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(error) => {
                self.scan_errors += 1;
                let err = Error::Scan {
                    row: self.rows_delivered,
                    error,
                };
                if self.config.scan_error_terminates {
                    return Err(self.fail(err));
                }
                Err(err)
            }
        }
    }

    /// Terminal status of the read.
    ///
    /// Only a fully consumed stream reports success. A read that is canceled,
    /// failed, or simply not finished yet reports an error carrying the
    /// number of rows delivered.
    #[inline]
    pub fn final_status(&self) -> Result<ReadSummary> {
        match &self.phase {
            Phase::Exhausted => Ok(ReadSummary {
                rows_delivered: self.rows_delivered,
                scan_errors: self.scan_errors,
            }),
            Phase::Canceled => Err(Error::Canceled {
                rows_delivered: self.rows_delivered,
            }),
            Phase::Failed(e) => Err(e.clone()),
            Phase::Open => Err(Error::Incomplete {
                rows_delivered: self.rows_delivered,
            }),
        }
    }

    /// Release the underlying stream. Calling it more than once is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
        if let Phase::Open = self.phase {
            log::warn!(
                "reader closed before end of stream, {} rows delivered",
                self.rows_delivered
            );
        } else {
            log::debug!("reader closed in state {:?}", self.state());
        }
    }

    #[inline]
    pub fn state(&self) -> ReadState {
        match self.phase {
            Phase::Open => ReadState::Open,
            Phase::Canceled => ReadState::Canceled,
            Phase::Exhausted => ReadState::Exhausted,
            Phase::Failed(_) => ReadState::Failed,
        }
    }

    #[inline]
    pub fn rows_delivered(&self) -> u64 {
        self.rows_delivered
    }

    #[inline]
    pub fn scan_errors(&self) -> u64 {
        self.scan_errors
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn policy(&self) -> CancelPolicy {
        self.config.policy
    }

    #[inline]
    fn settled(&self) -> Option<Result<Option<Row>>> {
        match &self.phase {
            Phase::Exhausted => Some(Ok(None)),
            Phase::Canceled => Some(Err(Error::Canceled {
                rows_delivered: self.rows_delivered,
            })),
            Phase::Failed(e) => Some(Err(e.clone())),
            Phase::Open if self.closed => Some(Err(Error::Closed {
                rows_delivered: self.rows_delivered,
            })),
            Phase::Open => None,
        }
    }

    #[inline]
    fn cancel(&mut self) -> Error {
        log::debug!(
            "reader observed cancellation, {} rows delivered",
            self.rows_delivered
        );
        self.phase = Phase::Canceled;
        Error::Canceled {
            rows_delivered: self.rows_delivered,
        }
    }

    #[inline]
    fn fail(&mut self, err: Error) -> Error {
        log::debug!("reader failed: {}", err);
        self.phase = Phase::Failed(err.clone());
        err
    }
}

impl<S: ResultStream> Drop for StreamingRowReader<S> {
    #[inline]
    fn drop(&mut self) {
        self.close()
    }
}

impl<S: ResultStream> fmt::Debug for StreamingRowReader<S> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingRowReader")
            .field("state", &self.state())
            .field("policy", &self.config.policy)
            .field("rows_delivered", &self.rows_delivered)
            .field("scan_errors", &self.scan_errors)
            .field("closed", &self.closed)
            .finish()
    }
}
