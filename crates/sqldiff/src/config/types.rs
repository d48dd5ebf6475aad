//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Audit columns skipped by [`DiffOptions::ignore_audit_columns`].
pub const AUDIT_COLUMNS: [&str; 4] = ["created", "modified", "created_user", "modified_user"];

/// Connection file contents (`dbinfo.json`).
#[derive(Clone, Serialize, Deserialize)]
pub struct DbInfo {
    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub passwd: String,

    /// Database host.
    pub host: String,

    /// Database port.
    pub port: u16,
}

impl fmt::Debug for DbInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbInfo")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("passwd", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// A validated data source name of the form `user:password@tcp(host:port)/database`.
#[derive(Clone, PartialEq, Eq)]
pub struct Dsn {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl Dsn {
    /// Render the DSN with the password masked.
    pub fn redacted(&self) -> String {
        format!(
            "{}:***@tcp({}:{})/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dsn")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// How rows of the two sides are paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    /// Pair rows by position only. An insertion or deletion in the middle of
    /// one side shifts every later pair.
    #[default]
    Positional,
    /// Pair rows by identity key, reporting the smaller key one-sided when
    /// the keys of the current pair differ.
    Keyed,
}

/// Immutable parameters of one diff invocation.
#[derive(Debug, Clone, Serialize)]
pub struct DiffOptions {
    /// Left table name, optionally followed by a WHERE clause.
    pub left: String,

    /// Right table name, optionally followed by a WHERE clause.
    pub right: String,

    /// Column projection (default: `*`).
    pub columns: String,

    /// Ordering/identity column (default: `id`).
    pub key_column: String,

    /// Columns excluded from comparison.
    pub ignored_columns: BTreeSet<String>,

    /// Row pairing strategy.
    pub align: AlignMode,

    /// Emit an event for every unchanged pair as well.
    pub report_unchanged: bool,
}

impl DiffOptions {
    /// Options comparing `left` against `right` with all defaults.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            columns: "*".to_string(),
            key_column: "id".to_string(),
            ignored_columns: BTreeSet::new(),
            align: AlignMode::Positional,
            report_unchanged: false,
        }
    }

    pub fn with_columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn with_key_column(mut self, key: impl Into<String>) -> Self {
        self.key_column = key.into();
        self
    }

    pub fn with_align(mut self, align: AlignMode) -> Self {
        self.align = align;
        self
    }

    pub fn with_report_unchanged(mut self, report: bool) -> Self {
        self.report_unchanged = report;
        self
    }

    /// Exclude a single column from comparison.
    pub fn ignore_column(mut self, column: impl Into<String>) -> Self {
        self.ignored_columns.insert(column.into());
        self
    }

    /// Exclude the creation/modification audit columns from comparison.
    pub fn ignore_audit_columns(mut self) -> Self {
        self.ignored_columns
            .extend(AUDIT_COLUMNS.iter().map(|c| c.to_string()));
        self
    }

    /// Whether `column` takes part in the comparison.
    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignored_columns.contains(column)
    }
}
