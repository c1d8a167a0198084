//! Collaborators consumed by the row reader.
//!
//! A [`DataSource`] opens a query on a [`Connection`] and hands out a
//! [`ResultStream`], which yields rows one pull at a time. How the
//! connection is established and how the query text is interpreted
//! is entirely up to the source.
pub mod error;
pub mod mem_impl;

use crate::error::Result;
use async_trait::async_trait;
use rowgate_datatype::Row;
use rowgate_runtime::CancellationSignal;

/// Opaque connection handle.
pub trait Connection: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> u32;
}

/// Ordered, incrementally produced sequence of rows.
#[async_trait]
pub trait ResultStream: Send {
    /// Pull next row. `Ok(None)` marks end of stream.
    async fn pull_next(&mut self) -> Result<Option<Row>>;

    /// Release all resources held by the stream.
    fn release(&mut self);
}

#[async_trait]
pub trait DataSource: Send + Sync {
    type Conn: Connection;
    type Stream: ResultStream;

    /// Start executing the query and return its result stream.
    /// The signal is handed over so the source can refuse or abort
    /// work on its own side.
    async fn open_query(
        &self,
        conn: &Self::Conn,
        query: &str,
        signal: &CancellationSignal,
    ) -> Result<Self::Stream>;
}
