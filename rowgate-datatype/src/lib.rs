#[macro_use]
mod macros;
pub mod error;
pub mod row;
pub mod scan;
pub mod value;

pub use error::ScanError;
pub use row::Row;
pub use scan::{FromRow, FromValue};
pub use value::Value;
