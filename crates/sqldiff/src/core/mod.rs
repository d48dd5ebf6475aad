//! Core abstractions shared by the engine and the row source adapters.
//!
//! - [`schema`]: column descriptors and scan type tags
//! - [`value`]: decoded column values and rows
//! - [`traits`]: the [`RowSource`] seam the engine consumes
//!
//! Adapters in `drivers` implement [`RowSource`]; the engine in `diff` only
//! sees this module's types, which keeps comparison logic testable without a
//! database.

pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{ColumnDescriptor, ScanType};
pub use traits::RowSource;
pub use value::{Row, SqlValue};
