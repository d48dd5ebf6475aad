//! Raw column values as delivered by a row source.
//!
//! Values are decoded once by the adapter and handed to the normalizer
//! unchanged; the engine never interprets them beyond the identity key.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// One decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Raw column bytes (text, decimal, blob, and similar columns).
    Bytes(Vec<u8>),

    /// 8-bit signed integer (tinyint).
    I8(i8),

    /// 32-bit signed integer (int).
    I32(i32),

    /// 32-bit unsigned integer (int unsigned).
    U32(u32),

    /// 64-bit signed integer (bigint).
    I64(i64),

    /// 32-bit floating point (float).
    F32(f32),

    /// 64-bit floating point (double).
    F64(f64),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// Date without time component.
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),
}

impl SqlValue {
    /// Create a bytes value from text.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        SqlValue::Bytes(s.into().into_bytes())
    }

    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Widen any integer variant to i64.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::I8(v) => Some(i64::from(*v)),
            SqlValue::I32(v) => Some(i64::from(*v)),
            SqlValue::U32(v) => Some(i64::from(*v)),
            SqlValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::I8(_) => "int8",
            SqlValue::I32(_) => "int32",
            SqlValue::U32(_) => "uint32",
            SqlValue::I64(_) => "int64",
            SqlValue::F32(_) => "float32",
            SqlValue::F64(_) => "float64",
            SqlValue::DateTime(_) => "datetime",
            SqlValue::Date(_) => "date",
            SqlValue::Time(_) => "time",
        }
    }
}

impl From<i8> for SqlValue {
    fn from(v: i8) -> Self {
        SqlValue::I8(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::U32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::F32(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::text(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Bytes(v.into_bytes())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// A row: one value per column descriptor, positionally aligned.
pub type Row = Vec<SqlValue>;
