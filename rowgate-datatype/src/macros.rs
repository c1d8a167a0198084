//! This module defines macros used by typed scanning.
macro_rules! impl_from_row {
    ($n:literal : $($ty:ident = $idx:tt),+) => {
        impl<$($ty: FromValue),+> FromRow for ($($ty,)+) {
            #[inline]
            fn from_row(row: &Row) -> Result<Self> {
                if row.len() != $n {
                    return Err(ScanError::ArityMismatch {
                        expected: $n,
                        found: row.len(),
                    });
                }
                Ok(($(row.get::<$ty>($idx)?,)+))
            }
        }
    };
}
