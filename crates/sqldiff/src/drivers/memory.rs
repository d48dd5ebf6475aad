//! In-memory row source.
//!
//! Serves a fixed list of rows, optionally failing at a chosen row. Used to
//! exercise the engine and the runner without a database.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::core::{ColumnDescriptor, Row, RowSource};
use crate::error::{DiffError, Result};

/// Row source over rows held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRowSource {
    label: String,
    columns: Vec<ColumnDescriptor>,
    rows: VecDeque<Row>,
    served: usize,
    failure: Option<(usize, String)>,
    closed: bool,
}

impl MemoryRowSource {
    pub fn new(label: impl Into<String>, columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Self {
        Self {
            label: label.into(),
            columns,
            rows: rows.into(),
            served: 0,
            failure: None,
            closed: false,
        }
    }

    /// Fail with a scan error when row `row` (1-based) is requested.
    pub fn fail_at(mut self, row: usize, message: impl Into<String>) -> Self {
        self.failure = Some((row, message.into()));
        self
    }

    /// Rows not yet served.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl RowSource for MemoryRowSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Row>> {
        if self.closed {
            return Err(DiffError::scan(&self.label, self.served, "source is closed"));
        }
        let next = self.served + 1;
        if let Some((row, message)) = &self.failure {
            if *row == next {
                return Err(DiffError::scan(&self.label, next, message));
            }
        }
        match self.rows.pop_front() {
            Some(row) => {
                self.served = next;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
