//! Cancelable streaming row reader.
//!
//! [`StreamingRowReader`] consumes a [`ResultStream`](rowgate_source::ResultStream)
//! one row per call and observes a [`CancellationSignal`](rowgate_runtime::CancellationSignal)
//! at well-defined points. What happens to a pull that is in flight when the
//! signal fires is chosen up front by [`CancelPolicy`], so the number of rows
//! delivered after a cancel never depends on timing inside the source.
pub mod config;
pub mod error;
pub mod reader;

pub use config::{CancelPolicy, ReaderConfig};
pub use error::{Error, Result};
pub use reader::{ReadState, ReadSummary, StreamingRowReader};

