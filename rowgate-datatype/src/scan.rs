use crate::error::{Result, ScanError};
use crate::row::Row;
use crate::value::Value;

/// Conversion from a single field value.
/// `column` is only used to report errors.
pub trait FromValue: Sized {
    fn from_value(value: &Value, column: usize) -> Result<Self>;
}

/// Conversion from a whole row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

#[inline]
fn mismatch(value: &Value, column: usize, expected: &'static str) -> ScanError {
    if value.is_null() {
        return ScanError::NullValue(column);
    }
    ScanError::TypeMismatch {
        column,
        expected,
        found: value.kind_name(),
    }
}

impl FromValue for i64 {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::UInt(u) => i64::try_from(*u).map_err(|_| ScanError::Overflow(column)),
            _ => Err(mismatch(value, column, "int")),
        }
    }
}

impl FromValue for i32 {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        let i = i64::from_value(value, column)?;
        i32::try_from(i).map_err(|_| ScanError::Overflow(column))
    }
}

impl FromValue for u64 {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        match value {
            Value::UInt(u) => Ok(*u),
            Value::Int(i) => u64::try_from(*i).map_err(|_| ScanError::Overflow(column)),
            _ => Err(mismatch(value, column, "uint")),
        }
    }
}

impl FromValue for f64 {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        match value {
            Value::Double(d) => Ok(*d),
            Value::Int(i) => Ok(*i as f64),
            Value::UInt(u) => Ok(*u as f64),
            _ => Err(mismatch(value, column, "double")),
        }
    }
}

impl FromValue for bool {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            _ => Err(mismatch(value, column, "bool")),
        }
    }
}

impl FromValue for String {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s.to_string()),
            _ => Err(mismatch(value, column, "text")),
        }
    }
}

impl FromValue for Vec<u8> {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        match value {
            Value::Bytes(bs) => Ok(bs.to_vec()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(mismatch(value, column, "bytes")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    #[inline]
    fn from_value(value: &Value, column: usize) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value, column).map(Some)
    }
}

impl_from_row!(1: A = 0);
impl_from_row!(2: A = 0, B = 1);
impl_from_row!(3: A = 0, B = 1, C = 2);
impl_from_row!(4: A = 0, B = 1, C = 2, D = 3);
