//! Streaming MySQL row source.
//!
//! Column scan types are taken from the prepared statement, so they are
//! known even when the table is empty. Rows are pulled from the server one
//! at a time; nothing is buffered beyond what the driver holds.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Column, Executor, Row as _, Statement, TypeInfo};
use tracing::debug;

use crate::core::{ColumnDescriptor, Row, RowSource, ScanType, SqlValue};
use crate::error::{DiffError, Result};

use super::temporal::{temporal_text, TemporalKind};

/// How a column is pulled out of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoder {
    Int32,
    Int64,
    Uint32,
    /// BIGINT UNSIGNED does not fit i64; carried as decimal text.
    Uint64Text,
    Float,
    Double,
    /// Raw value bytes rendered as the server's temporal text.
    Temporal(TemporalKind),
    Bytes,
    /// Unsupported column; the value is never read.
    Skip,
}

/// Map a MySQL type name to its scan type tag and decoder.
///
/// The server does not report nullability through the prepared statement,
/// so every supported column gets a nullable tag.
pub(crate) fn classify(type_name: &str) -> (ScanType, Decoder) {
    match type_name.to_uppercase().as_str() {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "YEAR" => {
            (ScanType::NullInt32, Decoder::Int32)
        }
        "BIGINT" => (ScanType::NullInt64, Decoder::Int64),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => {
            (ScanType::NullInt64, Decoder::Uint32)
        }
        "BIGINT UNSIGNED" => (ScanType::RawBytes, Decoder::Uint64Text),

        "FLOAT" => (ScanType::NullFloat64, Decoder::Float),
        "DOUBLE" => (ScanType::NullFloat64, Decoder::Double),

        "DATETIME" | "TIMESTAMP" => {
            (ScanType::NullTime, Decoder::Temporal(TemporalKind::DateTime))
        }
        "DATE" => (ScanType::NullTime, Decoder::Temporal(TemporalKind::Date)),
        "TIME" => (ScanType::NullTime, Decoder::Temporal(TemporalKind::Time)),

        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "BINARY"
        | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "DECIMAL" | "ENUM"
        | "SET" | "JSON" | "BIT" | "NULL" => (ScanType::RawBytes, Decoder::Bytes),

        other => (ScanType::Unsupported(other.to_string()), Decoder::Skip),
    }
}

fn decode(row: &MySqlRow, idx: usize, decoder: Decoder) -> std::result::Result<SqlValue, sqlx::Error> {
    Ok(match decoder {
        Decoder::Int32 => row.try_get_unchecked::<Option<i32>, _>(idx)?.into(),
        Decoder::Int64 => row.try_get_unchecked::<Option<i64>, _>(idx)?.into(),
        Decoder::Uint32 => row.try_get_unchecked::<Option<u32>, _>(idx)?.into(),
        Decoder::Uint64Text => row
            .try_get_unchecked::<Option<u64>, _>(idx)?
            .map(|v| SqlValue::text(v.to_string()))
            .unwrap_or(SqlValue::Null),
        Decoder::Float => row.try_get_unchecked::<Option<f32>, _>(idx)?.into(),
        Decoder::Double => row.try_get_unchecked::<Option<f64>, _>(idx)?.into(),
        Decoder::Temporal(kind) => match row.try_get_unchecked::<Option<&[u8]>, _>(idx)? {
            Some(raw) => {
                let text = temporal_text(kind, raw).map_err(|e| sqlx::Error::Decode(e.into()))?;
                SqlValue::text(text)
            }
            None => SqlValue::Null,
        },
        Decoder::Bytes => row.try_get_unchecked::<Option<Vec<u8>>, _>(idx)?.into(),
        Decoder::Skip => SqlValue::Null,
    })
}

/// One side of a diff, read from MySQL in key order.
pub struct MysqlRowSource<'a> {
    label: String,
    columns: Vec<ColumnDescriptor>,
    decoders: Vec<Decoder>,
    rows: BoxStream<'a, std::result::Result<MySqlRow, sqlx::Error>>,
    fetched: usize,
}

impl<'a> MysqlRowSource<'a> {
    /// Prepare `sql` to learn its columns, then start streaming it.
    pub async fn open(pool: &'a MySqlPool, label: impl Into<String>, sql: &'a str) -> Result<Self> {
        let label = label.into();
        let statement = pool
            .prepare(sql)
            .await
            .map_err(|e| DiffError::query(sql, e))?;

        let (columns, decoders): (Vec<_>, Vec<_>) = statement
            .columns()
            .iter()
            .map(|column| {
                let (scan_type, decoder) = classify(column.type_info().name());
                (ColumnDescriptor::new(column.name(), scan_type), decoder)
            })
            .unzip();

        debug!(
            "{}: {} columns [{}]",
            label,
            columns.len(),
            columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.scan_type))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            label,
            columns,
            decoders,
            rows: sqlx::query(sql).fetch(pool),
            fetched: 0,
        })
    }
}

#[async_trait]
impl<'a> RowSource for MysqlRowSource<'a> {
    fn label(&self) -> &str {
        &self.label
    }

    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(next) = self.rows.next().await else {
            return Ok(None);
        };
        let index = self.fetched + 1;
        let row = next.map_err(|e| DiffError::scan(&self.label, index, e))?;

        let values = self
            .decoders
            .iter()
            .enumerate()
            .map(|(idx, decoder)| {
                decode(&row, idx, *decoder).map_err(|e| {
                    DiffError::scan(
                        &self.label,
                        index,
                        format!("column {}: {}", self.columns[idx].name, e),
                    )
                })
            })
            .collect::<Result<Row>>()?;

        self.fetched = index;
        Ok(Some(values))
    }

    async fn close(&mut self) {
        // Dropping the stream returns its connection to the pool
        self.rows = stream::empty().boxed();
        debug!("{}: closed after {} rows", self.label, self.fetched);
    }
}
