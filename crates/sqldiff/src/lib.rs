//! # sqldiff
//!
//! Row-by-row comparison of two ordered SQL tables.
//!
//! Both tables are read once, in identity-key order, as two lazy row
//! streams. Each row pair is compared column by column on a normalized text
//! rendering of every value, and differences are delivered as a stream of
//! [`DiffEvent`]s to a [`DiffSink`]:
//!
//! - **Changed**: a paired row differs in one column
//! - **LeftOnly / RightOnly**: a row exists on one side only
//! - **Unchanged**: optional, for pairs that agree
//!
//! Memory use does not depend on table size.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sqldiff::{diff_tables, DiffOptions, Dsn, TextReport};
//!
//! #[tokio::main]
//! async fn main() -> sqldiff::Result<()> {
//!     let dsn = Dsn::from_option("app:secret@tcp(localhost:3306)/shop")?;
//!     let options = DiffOptions::new("bak_hoges", "hoges").ignore_audit_columns();
//!     let mut report = TextReport::new(std::io::stdout());
//!     let result = diff_tables(&dsn, &options, Duration::from_secs(30), &mut report).await?;
//!     report.finish(&result)?;
//!     println!("matched: {}", result.matched);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod diff;
pub mod drivers;
pub mod error;
pub mod report;
pub mod runner;

// Re-exports for convenient access
pub use config::{AlignMode, DbInfo, DiffOptions, Dsn, AUDIT_COLUMNS};
pub use crate::core::{ColumnDescriptor, Row, RowSource, ScanType, SqlValue};
pub use diff::{normalize, DiffEngine, DiffEvent, DiffResult, DiffSink};
pub use drivers::{MemoryRowSource, MysqlRowSource};
pub use error::{DiffError, Result, EXIT_ERROR};
pub use report::{JsonReport, TextReport};
pub use runner::{compare_sources, diff_tables};
