//! Ordering of identity keys for keyed alignment.
//!
//! Keyed alignment must order keys exactly as the server's `ORDER BY` did,
//! or a row present on both sides is reported twice. Only NULL and numeric
//! keys are ordered here; numeric text (BIGINT UNSIGNED, DECIMAL) is
//! compared by value, not by bytes. Character keys depend on the column
//! collation and have no key here.

use std::cmp::Ordering;

use crate::core::SqlValue;

/// Ordering key of a row's identity column. NULL sorts first, as in MySQL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum IdentityKey {
    Null,
    Number(Decimal),
}

impl IdentityKey {
    /// Key of `value`, or `None` when its server-side order is unknown.
    pub(crate) fn of(value: Option<&SqlValue>) -> Option<Self> {
        let text = match value? {
            SqlValue::Null => return Some(IdentityKey::Null),
            SqlValue::I8(v) => v.to_string(),
            SqlValue::I32(v) => v.to_string(),
            SqlValue::U32(v) => v.to_string(),
            SqlValue::I64(v) => v.to_string(),
            SqlValue::F32(v) if v.is_finite() => v.to_string(),
            SqlValue::F64(v) if v.is_finite() => v.to_string(),
            SqlValue::Bytes(b) => std::str::from_utf8(b).ok()?.trim().to_string(),
            _ => return None,
        };
        Decimal::parse(&text).map(IdentityKey::Number)
    }
}

/// Exact decimal number held as digit strings.
///
/// `int` has no leading zeros and `frac` no trailing zeros, so equal values
/// have equal fields and zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Decimal {
    negative: bool,
    int: String,
    frac: String,
}

impl Decimal {
    /// Parse `[-+]digits[.digits]`.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };
        let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int.is_empty() && frac.is_empty() {
            return None;
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let int = int.trim_start_matches('0').to_string();
        let frac = frac.trim_end_matches('0').to_string();
        let negative = negative && !(int.is_empty() && frac.is_empty());
        Some(Self {
            negative,
            int,
            frac,
        })
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.int
            .len()
            .cmp(&other.int.len())
            .then_with(|| self.int.cmp(&other.int))
            .then_with(|| self.frac.cmp(&other.frac))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: SqlValue) -> IdentityKey {
        IdentityKey::of(Some(&value)).unwrap()
    }

    #[test]
    fn test_numeric_text_orders_by_value() {
        assert!(key(SqlValue::text("9")) < key(SqlValue::text("10")));
        assert!(key(SqlValue::text("18446744073709551615")) > key(SqlValue::text("9")));
        assert!(key(SqlValue::text("10.5")) < key(SqlValue::text("10.55")));
    }

    #[test]
    fn test_decimal_order() {
        let ordered = ["-10", "-2", "-1.5", "0", "0.05", "0.5", "9", "10", "10.01", "100"];
        for pair in ordered.windows(2) {
            let (a, b) = (Decimal::parse(pair[0]).unwrap(), Decimal::parse(pair[1]).unwrap());
            assert!(a < b, "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_equal_spellings() {
        assert_eq!(Decimal::parse("007.50"), Decimal::parse("7.5"));
        assert_eq!(Decimal::parse("-0.0"), Decimal::parse("0"));
        assert_eq!(key(SqlValue::I64(10)), key(SqlValue::text("10.000")));
        assert_eq!(key(SqlValue::U32(3)), key(SqlValue::I8(3)));
    }

    #[test]
    fn test_null_sorts_first() {
        assert!(key(SqlValue::Null) < key(SqlValue::I64(i64::MIN)));
    }

    #[test]
    fn test_unordered_keys() {
        assert_eq!(IdentityKey::of(Some(&SqlValue::text("abc"))), None);
        assert_eq!(IdentityKey::of(Some(&SqlValue::text("1e5"))), None);
        assert_eq!(IdentityKey::of(Some(&SqlValue::F64(f64::NAN))), None);
        assert_eq!(IdentityKey::of(None), None);
        assert_eq!(Decimal::parse("-"), None);
        assert_eq!(Decimal::parse("."), None);
    }
}
