//! Ordered merge-diff of two row sources.
//!
//! Both sources are walked once, in lockstep, one row pair at a time:
//!
//! - **Both sides have a row**: the pair is compared column by column on the
//!   normalized text of each non-ignored column. Every differing column
//!   yields a [`DiffEvent::Changed`]; the pair counts once in
//!   `changed_rows`.
//! - **One side is exhausted**: each remaining row of the other side yields
//!   [`DiffEvent::LeftOnly`] or [`DiffEvent::RightOnly`].
//!
//! Pairing is positional by default. Rows inserted or deleted in the middle
//! of one side shift every later pair; [`AlignMode::Keyed`] compares the
//! identity keys of the current pair instead and holds back the row with the
//! larger key. Keyed alignment needs keys whose order is known (NULL and
//! numbers); on the first key it cannot order, the run continues
//! positionally. Memory use is bounded by the current pair in both modes.

mod key;
pub mod normalize;
pub mod types;

pub use normalize::normalize;
pub use types::{AlignMode, DiffEvent, DiffOptions, DiffResult, DiffSink};

use std::cmp::Ordering;

use self::key::IdentityKey;
use tracing::{debug, info, warn};

use crate::core::{ColumnDescriptor, Row, RowSource, SqlValue};
use crate::error::{DiffError, Result};

/// Engine comparing two ordered row sources.
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Create a new engine for one set of options.
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare `left` against `right`, emitting events into `sink`.
    ///
    /// Any error from either source, from the normalizer, or from the sink
    /// aborts the run; events emitted before the failure stay delivered.
    /// The sources are not closed here.
    pub async fn run<L, R, S>(&self, left: &mut L, right: &mut R, sink: &mut S) -> Result<DiffResult>
    where
        L: RowSource + ?Sized,
        R: RowSource + ?Sized,
        S: DiffSink + ?Sized,
    {
        let columns = shared_columns(&*left, &*right)?;
        let compared: Vec<bool> = columns
            .iter()
            .map(|c| !self.options.is_ignored(&c.name))
            .collect();

        debug!(
            "Comparing {} columns ({} ignored), align={:?}",
            columns.len(),
            compared.iter().filter(|c| !**c).count(),
            self.options.align
        );

        let mut left = Cursor::new(left, "left");
        let mut right = Cursor::new(right, "right");
        let mut result = DiffResult::default();
        let mut keyed = self.options.align == AlignMode::Keyed;

        loop {
            let left_row = left.next(columns.len()).await?;
            let right_row = right.next(columns.len()).await?;

            match (left_row, right_row) {
                (None, None) => break,
                (Some(row), None) => {
                    self.left_only(&columns, row, &left, sink, &mut result)?;
                }
                (None, Some(row)) => {
                    self.right_only(&columns, row, &right, sink, &mut result)?;
                }
                (Some(l), Some(r)) => {
                    let keys = if keyed {
                        match (IdentityKey::of(l.first()), IdentityKey::of(r.first())) {
                            (Some(lk), Some(rk)) => Some((lk, rk)),
                            _ => {
                                warn!(
                                    "Cannot order identity keys {} / {}; pairing rows by position from here on",
                                    key_text(&columns, &l, &left),
                                    key_text(&columns, &r, &right)
                                );
                                keyed = false;
                                None
                            }
                        }
                    } else {
                        None
                    };
                    if let Some((left_key, right_key)) = keys {
                        match left_key.cmp(&right_key) {
                            Ordering::Less => {
                                right.hold(r);
                                self.left_only(&columns, l, &left, sink, &mut result)?;
                                continue;
                            }
                            Ordering::Greater => {
                                left.hold(l);
                                self.right_only(&columns, r, &right, sink, &mut result)?;
                                continue;
                            }
                            Ordering::Equal => {}
                        }
                    }
                    self.compare_pair(&columns, &compared, (&l, &left), (&r, &right), sink, &mut result)?;
                }
            }
        }

        let result = result.seal();
        info!(
            "{} vs {}: {} left rows, {} right rows, {} changed, {} left-only, {} right-only",
            left.source.label(),
            right.source.label(),
            left.fetched,
            right.fetched,
            result.changed_rows,
            result.left_only,
            result.right_only
        );
        Ok(result)
    }

    fn compare_pair<L, R, S>(
        &self,
        columns: &[ColumnDescriptor],
        compared: &[bool],
        (l, left): (&Row, &Cursor<'_, L>),
        (r, right): (&Row, &Cursor<'_, R>),
        sink: &mut S,
        result: &mut DiffResult,
    ) -> Result<()>
    where
        L: RowSource + ?Sized,
        R: RowSource + ?Sized,
        S: DiffSink + ?Sized,
    {
        let mut keys: Option<(String, String)> = None;
        let mut changed = false;

        for (idx, column) in columns.iter().enumerate() {
            if !compared[idx] {
                continue;
            }
            let lv = left.normalize(column, &l[idx])?;
            let rv = right.normalize(column, &r[idx])?;
            if lv == rv {
                continue;
            }

            let (left_key, right_key) = match &keys {
                Some(pair) => pair.clone(),
                None => {
                    let pair = (key_text(columns, l, left), key_text(columns, r, right));
                    keys = Some(pair.clone());
                    pair
                }
            };
            debug!(
                "Row {}/{} column {} differs: {} != {}",
                left_key, right_key, column.name, lv, rv
            );
            sink.on_event(DiffEvent::Changed {
                left_key,
                right_key,
                column_index: idx,
                column: column.name.clone(),
                left: lv,
                right: rv,
            })?;
            changed = true;
        }

        if changed {
            result.changed_rows += 1;
        } else if self.options.report_unchanged {
            sink.on_event(DiffEvent::Unchanged {
                key: key_text(columns, l, left),
            })?;
        }
        Ok(())
    }

    fn left_only<C, S>(
        &self,
        columns: &[ColumnDescriptor],
        row: Row,
        cursor: &Cursor<'_, C>,
        sink: &mut S,
        result: &mut DiffResult,
    ) -> Result<()>
    where
        C: RowSource + ?Sized,
        S: DiffSink + ?Sized,
    {
        let key = key_text(columns, &row, cursor);
        debug!("Row {} only in {}", key, cursor.source.label());
        result.left_only += 1;
        sink.on_event(DiffEvent::LeftOnly { key, row })
    }

    fn right_only<C, S>(
        &self,
        columns: &[ColumnDescriptor],
        row: Row,
        cursor: &Cursor<'_, C>,
        sink: &mut S,
        result: &mut DiffResult,
    ) -> Result<()>
    where
        C: RowSource + ?Sized,
        S: DiffSink + ?Sized,
    {
        let key = key_text(columns, &row, cursor);
        debug!("Row {} only in {}", key, cursor.source.label());
        result.right_only += 1;
        sink.on_event(DiffEvent::RightOnly { key, row })
    }
}

/// Column list both sides are compared under.
///
/// The left side's descriptors are authoritative. Differing widths cannot be
/// compared positionally and fail; differing names or types only warn.
fn shared_columns<L, R>(left: &L, right: &R) -> Result<Vec<ColumnDescriptor>>
where
    L: RowSource + ?Sized,
    R: RowSource + ?Sized,
{
    let (lc, rc) = (left.columns(), right.columns());
    if lc.len() != rc.len() {
        return Err(DiffError::query(
            right.label(),
            format!(
                "projects {} columns but {} projects {}",
                rc.len(),
                left.label(),
                lc.len()
            ),
        ));
    }
    for (l, r) in lc.iter().zip(rc) {
        if l != r {
            warn!(
                "Column mismatch: {} {} ({}) vs {} {} ({}); comparing with left definition",
                left.label(),
                l.name,
                l.scan_type,
                right.label(),
                r.name,
                r.scan_type
            );
        }
    }
    Ok(lc.to_vec())
}

/// Text of the identity column, used for diagnostics only.
///
/// Never fails: an identity column excluded from comparison may hold values
/// the normalizer rejects.
fn key_text<S: RowSource + ?Sized>(
    columns: &[ColumnDescriptor],
    row: &Row,
    cursor: &Cursor<'_, S>,
) -> String {
    match (columns.first(), row.first()) {
        (Some(column), Some(value)) => cursor
            .normalize(column, value)
            .unwrap_or_else(|_| normalize::lenient(value)),
        _ => String::new(),
    }
}

/// Read position in one source, with room for one held-back row.
struct Cursor<'s, S: RowSource + ?Sized> {
    source: &'s mut S,
    side: &'static str,
    fetched: usize,
    exhausted: bool,
    held: Option<Row>,
}

impl<'s, S: RowSource + ?Sized> Cursor<'s, S> {
    fn new(source: &'s mut S, side: &'static str) -> Self {
        Self {
            source,
            side,
            fetched: 0,
            exhausted: false,
            held: None,
        }
    }

    /// Next row, never polling the source again once it reported the end.
    async fn next(&mut self, width: usize) -> Result<Option<Row>> {
        if let Some(row) = self.held.take() {
            return Ok(Some(row));
        }
        if self.exhausted {
            return Ok(None);
        }
        match self.source.next_row().await? {
            Some(row) => {
                self.fetched += 1;
                if row.len() != width {
                    return Err(DiffError::scan(
                        self.source.label(),
                        self.fetched,
                        format!("expected {} values, got {}", width, row.len()),
                    ));
                }
                Ok(Some(row))
            }
            None => {
                debug!("{} source {} exhausted after {} rows", self.side, self.source.label(), self.fetched);
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    fn hold(&mut self, row: Row) {
        self.held = Some(row);
    }

    /// Normalize a value of the current row, labelling scan errors with
    /// this side and row.
    fn normalize(&self, column: &ColumnDescriptor, value: &SqlValue) -> Result<String> {
        normalize(value, &column.scan_type).map_err(|e| match e {
            DiffError::Scan { message, .. } => DiffError::scan(
                self.source.label(),
                self.fetched,
                format!("column {}: {}", column.name, message),
            ),
            other => other,
        })
    }
}
