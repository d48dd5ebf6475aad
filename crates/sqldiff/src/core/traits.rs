//! The row source seam consumed by the diff engine.

use async_trait::async_trait;

use crate::error::Result;

use super::schema::ColumnDescriptor;
use super::value::Row;

/// An ordered, lazily produced sequence of rows for one table or query.
///
/// Implementations deliver rows in non-decreasing order of the identity
/// column and decode each value according to the scan type reported by
/// [`columns`](RowSource::columns).
#[async_trait]
pub trait RowSource: Send {
    /// Human-readable name of the side (table or query), used in errors.
    fn label(&self) -> &str;

    /// Column descriptors, fixed for the lifetime of the source.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Fetch the next row, or `None` once the source is exhausted.
    ///
    /// Callers must not poll again after `None`.
    async fn next_row(&mut self) -> Result<Option<Row>>;

    /// Release the underlying cursor.
    async fn close(&mut self);
}
