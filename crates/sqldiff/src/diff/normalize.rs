//! Canonical string form of a column value.
//!
//! Both sides of a comparison are reduced to strings with the same rules and
//! compared for exact equality. Key normalization rules:
//! - NULLs: the literal `null` (only for nullable scan types)
//! - Raw bytes: their text content
//! - Date/time: `YYYY-MM-DD HH:MM:SS[.fraction]`
//! - Integers: decimal
//! - Floats: `%e` style scientific notation with six fraction digits
//!
//! Floats are deliberately compared by rendered text, not numerically:
//! values closer than the rendered precision compare equal.

use crate::core::{ScanType, SqlValue};
use crate::error::{DiffError, Result};

/// Literal used for NULL in nullable columns.
pub const NULL_TEXT: &str = "null";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Convert a raw value into its comparable text for the given scan type.
///
/// Fails with [`DiffError::UnsupportedType`] for tags outside the known set,
/// and with a scan error when the value does not fit its declared tag.
pub fn normalize(value: &SqlValue, scan_type: &ScanType) -> Result<String> {
    if let ScanType::Unsupported(name) = scan_type {
        return Err(DiffError::UnsupportedType(name.clone()));
    }
    if value.is_null() && scan_type.is_nullable() {
        return Ok(NULL_TEXT.to_string());
    }

    let text = match (scan_type, value) {
        (ScanType::RawBytes | ScanType::NullTime, SqlValue::Bytes(b)) => {
            String::from_utf8_lossy(b).into_owned()
        }
        (ScanType::NullTime, SqlValue::DateTime(v)) => v.format(DATETIME_FORMAT).to_string(),
        (ScanType::NullTime, SqlValue::Date(v)) => v.format(DATE_FORMAT).to_string(),
        (ScanType::NullTime, SqlValue::Time(v)) => v.format(TIME_FORMAT).to_string(),

        (
            ScanType::NullInt64,
            v @ (SqlValue::I8(_) | SqlValue::I32(_) | SqlValue::U32(_) | SqlValue::I64(_)),
        ) => v.as_i64().map(|n| n.to_string()).unwrap_or_default(),
        (ScanType::NullInt32, SqlValue::I32(v)) | (ScanType::Int32, SqlValue::I32(v)) => {
            v.to_string()
        }
        (ScanType::NullInt32, SqlValue::I8(v)) | (ScanType::Int8, SqlValue::I8(v)) => {
            v.to_string()
        }
        (ScanType::Uint32, SqlValue::U32(v)) => v.to_string(),
        (ScanType::Int64, SqlValue::I64(v)) => v.to_string(),

        (ScanType::Float32, SqlValue::F32(v)) => scientific(format!("{:.6e}", v)),
        (ScanType::Float64 | ScanType::NullFloat64, SqlValue::F64(v)) => float64(*v),
        (ScanType::NullFloat64, SqlValue::F32(v)) => float64(f64::from(*v)),

        (tag, v) => return Err(mismatch(v, tag)),
    };

    Ok(text)
}

/// Render a value without consulting its scan type.
///
/// Used where text is only shown, never compared.
pub fn lenient(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => NULL_TEXT.to_string(),
        SqlValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        SqlValue::I8(v) => v.to_string(),
        SqlValue::I32(v) => v.to_string(),
        SqlValue::U32(v) => v.to_string(),
        SqlValue::I64(v) => v.to_string(),
        SqlValue::F32(v) => float64(f64::from(*v)),
        SqlValue::F64(v) => float64(*v),
        SqlValue::DateTime(v) => v.format(DATETIME_FORMAT).to_string(),
        SqlValue::Date(v) => v.format(DATE_FORMAT).to_string(),
        SqlValue::Time(v) => v.format(TIME_FORMAT).to_string(),
    }
}

/// Scan error for a value whose shape disagrees with its column's tag.
///
/// Side and row are unknown here; the engine re-labels the error.
fn mismatch(value: &SqlValue, tag: &ScanType) -> DiffError {
    DiffError::scan(
        "value",
        0,
        format!("{} value does not fit scan type {}", value.kind(), tag),
    )
}

fn float64(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    scientific(format!("{:.6e}", v))
}

/// Rewrite Rust's `1.000000e0` exponent into the signed two-digit `e+00` form.
fn scientific(formatted: String) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // NaN / inf for f32
        None => match formatted.as_str() {
            "inf" => "+Inf".to_string(),
            "-inf" => "-Inf".to_string(),
            _ => formatted,
        },
    }
}
