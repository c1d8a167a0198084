use crate::error::{Error, Result};
use crate::{Connection, DataSource, ResultStream};
use async_io::Timer;
use async_trait::async_trait;
use flume::Receiver;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rowgate_datatype::{Row, Value};
use rowgate_runtime::CancellationSignal;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory data source.
///
/// Query text is the name of a registered table, matched
/// case-insensitively after trimming.
#[derive(Debug, Default)]
pub struct MemSource {
    inner: RwLock<IndexMap<String, MemTable>>,
    // auto-incremental connection id, starts from 1.
    conn_id_gen: AtomicU32,
    counters: Arc<StreamCounters>,
}

impl MemSource {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any table with the same name.
    #[inline]
    pub fn add_table(&self, name: &str, table: MemTable) {
        let mut inner = self.inner.write();
        inner.insert(normalize(name), table);
    }

    #[inline]
    pub fn exists_table(&self, name: &str) -> bool {
        let inner = self.inner.read();
        inner.contains_key(&normalize(name))
    }

    #[inline]
    pub fn connect(&self) -> MemConn {
        let id = self.conn_id_gen.fetch_add(1, Ordering::SeqCst) + 1;
        MemConn { id }
    }

    /// Number of streams opened so far.
    #[inline]
    pub fn opened_streams(&self) -> usize {
        self.counters.opened.load(Ordering::Acquire)
    }

    /// Number of streams released so far.
    #[inline]
    pub fn released_streams(&self) -> usize {
        self.counters.released.load(Ordering::Acquire)
    }
}

#[async_trait]
impl DataSource for MemSource {
    type Conn = MemConn;
    type Stream = MemStream;

    async fn open_query(
        &self,
        conn: &MemConn,
        query: &str,
        signal: &CancellationSignal,
    ) -> Result<MemStream> {
        if signal.is_canceled() {
            return Err(Error::Canceled);
        }
        let table = {
            let inner = self.inner.read();
            inner
                .get(&normalize(query))
                .cloned()
                .ok_or_else(|| Error::QueryNotFound(query.to_string()))?
        };
        if let Some(latency) = table.open_latency {
            Timer::after(latency).await;
        }
        self.counters.opened.fetch_add(1, Ordering::AcqRel);
        log::debug!("connection {} opened stream on '{}'", conn.id, query.trim());
        Ok(MemStream {
            table,
            conn_id: conn.id,
            pulled: 0,
            released: false,
            counters: Arc::clone(&self.counters),
        })
    }
}

#[derive(Debug, Default)]
struct StreamCounters {
    opened: AtomicUsize,
    released: AtomicUsize,
}

#[inline]
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemConn {
    id: u32,
}

impl Connection for MemConn {
    #[inline]
    fn id(&self) -> u32 {
        self.id
    }
}

/// How fast a stream produces rows.
#[derive(Debug, Clone)]
pub enum Pace {
    Immediate,
    /// Every pull sleeps for given duration.
    Latency(Duration),
    /// Every pull waits for one ticket from the channel.
    Gated(Receiver<()>),
}

#[derive(Debug, Clone)]
enum TableData {
    Rows(Arc<[Row]>),
    /// Single int column with values from start to end, inclusive.
    Series { start: i64, end: i64 },
}

impl TableData {
    #[inline]
    fn row_at(&self, idx: u64) -> Option<Row> {
        match self {
            TableData::Rows(rows) => usize::try_from(idx)
                .ok()
                .and_then(|i| rows.get(i))
                .cloned(),
            TableData::Series { start, end } => {
                let n = i64::try_from(idx).ok().and_then(|i| start.checked_add(i))?;
                if n > *end {
                    return None;
                }
                Some(Row::new(vec![Value::Int(n)]))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemTable {
    data: TableData,
    pace: Pace,
    // 1-based number of the pull that fails.
    fail_at: Option<u64>,
    open_latency: Option<Duration>,
}

impl MemTable {
    #[inline]
    pub fn rows(rows: Vec<Row>) -> Self {
        MemTable {
            data: TableData::Rows(rows.into()),
            pace: Pace::Immediate,
            fail_at: None,
            open_latency: None,
        }
    }

    /// Rows are generated on demand, so a large series costs nothing up front.
    #[inline]
    pub fn series(start: i64, end: i64) -> Self {
        MemTable {
            data: TableData::Series { start, end },
            pace: Pace::Immediate,
            fail_at: None,
            open_latency: None,
        }
    }

    #[inline]
    pub fn latency(mut self, latency: Duration) -> Self {
        self.pace = Pace::Latency(latency);
        self
    }

    #[inline]
    pub fn gated(mut self, gate: Receiver<()>) -> Self {
        self.pace = Pace::Gated(gate);
        self
    }

    #[inline]
    pub fn fail_at(mut self, pull_nr: u64) -> Self {
        self.fail_at = Some(pull_nr);
        self
    }

    /// Opening a stream on this table sleeps for given duration first.
    #[inline]
    pub fn open_latency(mut self, latency: Duration) -> Self {
        self.open_latency = Some(latency);
        self
    }
}

#[derive(Debug)]
pub struct MemStream {
    table: MemTable,
    conn_id: u32,
    pulled: u64,
    released: bool,
    counters: Arc<StreamCounters>,
}

impl MemStream {
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

#[async_trait]
impl ResultStream for MemStream {
    async fn pull_next(&mut self) -> Result<Option<Row>> {
        if self.released {
            return Err(Error::StreamReleased);
        }
        match &self.table.pace {
            Pace::Immediate => (),
            Pace::Latency(latency) => {
                Timer::after(*latency).await;
            }
            Pace::Gated(gate) => {
                gate.recv_async().await.map_err(|_| Error::GateClosed)?;
            }
        }
        let pull_nr = self.pulled + 1;
        if self.table.fail_at == Some(pull_nr) {
            return Err(Error::Fault { row: pull_nr });
        }
        let row = self.table.data.row_at(self.pulled);
        if row.is_some() {
            self.pulled = pull_nr;
        }
        Ok(row)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.counters.released.fetch_add(1, Ordering::AcqRel);
        log::debug!(
            "connection {} released stream after {} rows",
            self.conn_id,
            self.pulled
        );
    }
}
