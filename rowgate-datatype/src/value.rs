use std::fmt;

/// Single field value of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Text(Box<str>),
    Bytes(Box<[u8]>),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value kind, used in scan errors.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for Value {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Double(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(bs) => {
                f.write_str("0x")?;
                for b in bs.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(src: bool) -> Self {
        Value::Bool(src)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(src: i64) -> Self {
        Value::Int(src)
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(src: u64) -> Self {
        Value::UInt(src)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(src: f64) -> Self {
        Value::Double(src)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(src: &str) -> Self {
        Value::Text(src.into())
    }
}

impl From<&[u8]> for Value {
    #[inline]
    fn from(src: &[u8]) -> Self {
        Value::Bytes(src.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(src: Option<T>) -> Self {
        src.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!("NULL", Value::Null.to_string());
        assert_eq!("-3", Value::from(-3i64).to_string());
        assert_eq!("abc", Value::from("abc").to_string());
        assert_eq!("0x0aff", Value::from(&[10u8, 255][..]).to_string());
        assert_eq!(Value::Null, Value::from(None::<i64>));
    }
}
