use crate::error::{Result, ScanError};
use crate::scan::{FromRow, FromValue};
use crate::value::Value;

/// Row is an ordered tuple of field values for one record.
///
/// Rows are owned values. Once delivered, a row stays readable
/// regardless of what happens to the stream it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    #[inline]
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn value(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Convert a single field into typed value.
    #[inline]
    pub fn get<T: FromValue>(&self, idx: usize) -> Result<T> {
        let value = self
            .values
            .get(idx)
            .ok_or(ScanError::ColumnOutOfRange(idx))?;
        T::from_value(value, idx)
    }

    /// Convert the whole row into a typed tuple.
    #[inline]
    pub fn scan<T: FromRow>(&self) -> Result<T> {
        T::from_row(self)
    }
}

impl From<Vec<Value>> for Row {
    #[inline]
    fn from(values: Vec<Value>) -> Self {
        Row { values }
    }
}

impl FromIterator<Value> for Row {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Row {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_get() {
        let row: Row = vec![Value::Int(7), Value::Null, Value::from("x")].into();
        assert_eq!(3, row.len());
        assert_eq!(7i64, row.get::<i64>(0).unwrap());
        assert_eq!(None, row.get::<Option<i64>>(1).unwrap());
        assert_eq!(Err(ScanError::NullValue(1)), row.get::<i64>(1));
        assert_eq!(Err(ScanError::ColumnOutOfRange(3)), row.get::<i64>(3));
        assert_eq!("x", row.get::<String>(2).unwrap());
    }

    #[test]
    fn test_row_scan() {
        let row: Row = vec![Value::Int(1), Value::from("a")].into_iter().collect();
        let (n, s): (i64, String) = row.scan().unwrap();
        assert_eq!((1, "a".to_string()), (n, s));
        assert_eq!(
            Err(ScanError::ArityMismatch {
                expected: 1,
                found: 2
            }),
            row.scan::<(i64,)>()
        );
        assert!(matches!(
            row.scan::<(i64, i64)>(),
            Err(ScanError::TypeMismatch { column: 1, .. })
        ));
    }
}
