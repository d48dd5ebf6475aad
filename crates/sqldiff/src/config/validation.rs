//! Configuration validation.

use std::sync::LazyLock;

use regex::Regex;

use super::{DiffOptions, Dsn};
use crate::error::{DiffError, Result};

/// Accepted DSN shape. The password part is free-form.
static DSN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]+):(.*)@tcp\(([a-z0-9_.-]+):([0-9]+)\)/([a-zA-Z0-9_.-]+)$")
        .expect("DSN pattern is valid")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("identifier pattern is valid"));

/// Check a DSN string against the accepted shape and split it into parts.
pub fn parse_dsn(dsn: &str) -> Result<Dsn> {
    let caps = DSN_PATTERN
        .captures(dsn)
        .ok_or_else(|| DiffError::Config(format!("invalid DSN format: {}", mask(dsn))))?;

    let port = caps[4]
        .parse::<u16>()
        .map_err(|_| DiffError::Config(format!("invalid DSN port: {}", &caps[4])))?;

    Ok(Dsn {
        user: caps[1].to_string(),
        password: caps[2].to_string(),
        host: caps[3].to_string(),
        port,
        database: caps[5].to_string(),
    })
}

/// Mask everything between the first ':' and the last "@tcp(" of a DSN.
fn mask(dsn: &str) -> String {
    match (dsn.find(':'), dsn.rfind("@tcp(")) {
        (Some(colon), Some(at)) if colon < at => {
            format!("{}:***{}", &dsn[..colon], &dsn[at..])
        }
        _ => dsn.to_string(),
    }
}

/// Validate the diff options.
pub fn validate(options: &DiffOptions) -> Result<()> {
    if options.left.trim().is_empty() {
        return Err(DiffError::Config("left table is required".into()));
    }
    if options.right.trim().is_empty() {
        return Err(DiffError::Config("right table is required".into()));
    }
    if options.columns.trim().is_empty() {
        return Err(DiffError::Config("column projection must not be empty".into()));
    }
    if !IDENTIFIER.is_match(&options.key_column) {
        return Err(DiffError::Config(format!(
            "key column must be a plain identifier, got '{}'",
            options.key_column
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dsn() {
        let dsn = parse_dsn("scott:tiger@tcp(db.local:3306)/shop").unwrap();
        assert_eq!(dsn.user, "scott");
        assert_eq!(dsn.password, "tiger");
        assert_eq!(dsn.host, "db.local");
        assert_eq!(dsn.port, 3306);
        assert_eq!(dsn.database, "shop");
    }

    #[test]
    fn test_password_may_contain_at_and_colon() {
        let dsn = parse_dsn("root:p@ss:w@rd@tcp(127.0.0.1:3306)/app_db").unwrap();
        assert_eq!(dsn.user, "root");
        assert_eq!(dsn.password, "p@ss:w@rd");
        assert_eq!(dsn.host, "127.0.0.1");
    }

    #[test]
    fn test_empty_password() {
        let dsn = parse_dsn("root:@tcp(localhost:3306)/test").unwrap();
        assert_eq!(dsn.password, "");
    }

    #[test]
    fn test_invalid_dsn_shapes() {
        for bad in [
            "",
            "root@tcp(localhost:3306)/db",
            "Root:x@tcp(localhost:3306)/db",
            "root:x@localhost:3306/db",
            "root:x@tcp(localhost)/db",
            "root:x@tcp(localhost:3306)/",
            "root:x@tcp(LOCALHOST:3306)/db",
            "mysql://root:x@localhost:3306/db",
        ] {
            assert!(parse_dsn(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_port_out_of_range() {
        let err = parse_dsn("root:x@tcp(localhost:70000)/db").unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_invalid_dsn_error_masks_password() {
        let err = parse_dsn("root:secret@tcp(localhost:3306)/").unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_valid_options() {
        let options = DiffOptions::new("bak_hoges", "hoges WHERE deleted = 0");
        assert!(validate(&options).is_ok());
    }

    #[test]
    fn test_missing_tables() {
        assert!(validate(&DiffOptions::new("", "hoges")).is_err());
        assert!(validate(&DiffOptions::new("hoges", "  ")).is_err());
    }

    #[test]
    fn test_key_column_must_be_identifier() {
        let options = DiffOptions::new("a", "b").with_key_column("id; DROP TABLE a");
        assert!(validate(&options).is_err());

        let options = DiffOptions::new("a", "b").with_key_column("order_no");
        assert!(validate(&options).is_ok());
    }

    #[test]
    fn test_empty_projection() {
        let options = DiffOptions::new("a", "b").with_columns("");
        assert!(validate(&options).is_err());
    }
}
