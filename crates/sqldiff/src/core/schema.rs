//! Column metadata shared by both sides of a diff run.

use serde::Serialize;
use std::fmt;

/// Scan type tag of a column.
///
/// The set is closed: anything the adapter cannot classify is carried as
/// [`ScanType::Unsupported`] and rejected by the normalizer when compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ScanType {
    /// Nullable raw bytes (text, decimal, blob).
    RawBytes,
    /// Nullable 64-bit integer.
    NullInt64,
    /// Nullable 32-bit integer.
    NullInt32,
    /// Nullable date/time, delivered as text or chrono values.
    NullTime,
    /// Nullable double.
    NullFloat64,
    Float32,
    Float64,
    Int8,
    Int32,
    Uint32,
    Int64,
    /// A type the normalizer has no rule for; carries the database type name.
    Unsupported(String),
}

impl ScanType {
    /// Display name of the tag.
    pub fn name(&self) -> &str {
        match self {
            ScanType::RawBytes => "RawBytes",
            ScanType::NullInt64 => "NullInt64",
            ScanType::NullInt32 => "NullInt32",
            ScanType::NullTime => "NullTime",
            ScanType::NullFloat64 => "NullFloat64",
            ScanType::Float32 => "float32",
            ScanType::Float64 => "float64",
            ScanType::Int8 => "int8",
            ScanType::Int32 => "int32",
            ScanType::Uint32 => "uint32",
            ScanType::Int64 => "int64",
            ScanType::Unsupported(name) => name,
        }
    }

    /// Whether NULL is a legal value for this tag.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            ScanType::RawBytes
                | ScanType::NullInt64
                | ScanType::NullInt32
                | ScanType::NullTime
                | ScanType::NullFloat64
        )
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name and scan type of one projected column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub scan_type: ScanType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, scan_type: ScanType) -> Self {
        Self {
            name: name.into(),
            scan_type,
        }
    }
}
