//! Type definitions for the merge-diff engine.

use serde::Serialize;

use crate::core::Row;
use crate::error::Result;

// Re-export the options the engine consumes
pub use crate::config::{AlignMode, DiffOptions};

/// One observed alignment outcome between the two row sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffEvent {
    /// Both rows agree on every compared column.
    Unchanged { key: String },

    /// One differing column of a matched row pair.
    Changed {
        left_key: String,
        right_key: String,
        column_index: usize,
        column: String,
        left: String,
        right: String,
    },

    /// A row present only in the left source.
    LeftOnly {
        key: String,
        #[serde(skip)]
        row: Row,
    },

    /// A row present only in the right source.
    RightOnly {
        key: String,
        #[serde(skip)]
        row: Row,
    },
}

impl DiffEvent {
    /// Whether this event reports a difference.
    pub fn is_difference(&self) -> bool {
        !matches!(self, DiffEvent::Unchanged { .. })
    }
}

/// Outcome of one diff invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// Matched pairs with at least one differing column.
    pub changed_rows: u64,
    /// Rows found only on the left side.
    pub left_only: u64,
    /// Rows found only on the right side.
    pub right_only: u64,
    /// True when no difference of any kind was found.
    pub matched: bool,
}

impl DiffResult {
    /// Total rows that differ, one-sided rows included.
    pub fn differing_rows(&self) -> u64 {
        self.changed_rows + self.left_only + self.right_only
    }

    pub(crate) fn seal(mut self) -> Self {
        self.matched = self.differing_rows() == 0;
        self
    }
}

/// Receives diff events in stream order.
pub trait DiffSink {
    fn on_event(&mut self, event: DiffEvent) -> Result<()>;
}

impl DiffSink for Vec<DiffEvent> {
    fn on_event(&mut self, event: DiffEvent) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: DiffSink + ?Sized> DiffSink for &mut S {
    fn on_event(&mut self, event: DiffEvent) -> Result<()> {
        (**self).on_event(event)
    }
}
