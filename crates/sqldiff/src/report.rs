//! Rendering of diff events.
//!
//! [`TextReport`] prints the classic line format:
//!
//! ```text
//! --- bak_hoges
//! +++ hoges
//!     id=(   2,   2),                 name=(b,c)
//! -@@ id=7
//!       2 rows are found
//! ```
//!
//! [`JsonReport`] writes one JSON object per event followed by the result.

use std::io::Write;

use serde::Serialize;

use crate::diff::{DiffEvent, DiffResult, DiffSink};
use crate::error::Result;

/// Human-readable report.
pub struct TextReport<W: Write> {
    out: W,
    header: Option<(String, String)>,
    header_written: bool,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header: None,
            header_written: false,
        }
    }

    /// Print `--- left` / `+++ right` once, before the first difference.
    pub fn with_header(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.header = Some((left.into(), right.into()));
        self
    }

    fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        if let Some((left, right)) = &self.header {
            writeln!(self.out, "--- {}", left)?;
            writeln!(self.out, "+++ {}", right)?;
        }
        self.header_written = true;
        Ok(())
    }

    /// Print the differing-row total, if any, and flush.
    ///
    /// One-sided rows count toward the total, so the footer is present
    /// exactly when the result is not a match.
    pub fn finish(mut self, result: &DiffResult) -> Result<W> {
        if result.differing_rows() > 0 {
            writeln!(self.out, "      {} rows are found", result.differing_rows())?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> DiffSink for TextReport<W> {
    fn on_event(&mut self, event: DiffEvent) -> Result<()> {
        match event {
            DiffEvent::Unchanged { key } => {
                writeln!(self.out, "=@@ id={}", key)?;
            }
            DiffEvent::Changed {
                left_key,
                right_key,
                column,
                left,
                right,
                ..
            } => {
                self.write_header()?;
                writeln!(
                    self.out,
                    "    id=({:>4},{:>4}), {:>20}=({},{})",
                    left_key, right_key, column, left, right
                )?;
            }
            DiffEvent::LeftOnly { key, .. } => {
                self.write_header()?;
                writeln!(self.out, "-@@ id={}", key)?;
            }
            DiffEvent::RightOnly { key, .. } => {
                self.write_header()?;
                writeln!(self.out, "+@@ id={}", key)?;
            }
        }
        Ok(())
    }
}

/// Line-delimited JSON report.
pub struct JsonReport<W: Write> {
    out: W,
}

#[derive(Serialize)]
struct ResultLine<'a> {
    kind: &'static str,
    #[serde(flatten)]
    result: &'a DiffResult,
}

impl<W: Write> JsonReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the result line and flush.
    pub fn finish(mut self, result: &DiffResult) -> Result<W> {
        let line = ResultLine {
            kind: "result",
            result,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> DiffSink for JsonReport<W> {
    fn on_event(&mut self, event: DiffEvent) -> Result<()> {
        serde_json::to_writer(&mut self.out, &event)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnDescriptor, Row, ScanType, SqlValue};
    use crate::diff::{DiffEngine, DiffOptions};
    use crate::drivers::MemoryRowSource;

    fn changed() -> DiffEvent {
        DiffEvent::Changed {
            left_key: "2".into(),
            right_key: "2".into(),
            column_index: 1,
            column: "name".into(),
            left: "b".into(),
            right: "c".into(),
        }
    }

    fn result(changed_rows: u64) -> DiffResult {
        DiffResult {
            changed_rows,
            left_only: 0,
            right_only: 0,
            matched: changed_rows == 0,
        }
    }

    fn text(report: TextReport<Vec<u8>>, result: &DiffResult) -> String {
        String::from_utf8(report.finish(result).unwrap()).unwrap()
    }

    #[test]
    fn test_changed_line_format() {
        let mut report = TextReport::new(Vec::new());
        report.on_event(changed()).unwrap();
        assert_eq!(
            text(report, &result(1)),
            "    id=(   2,   2),                 name=(b,c)\n      1 rows are found\n"
        );
    }

    #[test]
    fn test_header_printed_once_before_first_difference() {
        let mut report = TextReport::new(Vec::new()).with_header("bak_hoges", "hoges");
        report.on_event(changed()).unwrap();
        report
            .on_event(DiffEvent::RightOnly {
                key: "9".into(),
                row: vec![],
            })
            .unwrap();
        let output = text(report, &result(1));
        assert!(output.starts_with("--- bak_hoges\n+++ hoges\n"));
        assert_eq!(output.matches("--- bak_hoges").count(), 1);
        assert!(output.contains("+@@ id=9\n"));
    }

    #[test]
    fn test_no_header_when_identical() {
        let report = TextReport::new(Vec::new()).with_header("a", "b");
        assert_eq!(text(report, &result(0)), "");
    }

    #[test]
    fn test_one_sided_markers() {
        let mut report = TextReport::new(Vec::new());
        report
            .on_event(DiffEvent::LeftOnly {
                key: "4".into(),
                row: vec![],
            })
            .unwrap();
        report
            .on_event(DiffEvent::Unchanged { key: "5".into() })
            .unwrap();
        assert_eq!(text(report, &result(0)), "-@@ id=4\n=@@ id=5\n");
    }

    #[test]
    fn test_json_lines() {
        let mut report = JsonReport::new(Vec::new());
        report.on_event(changed()).unwrap();
        let output = String::from_utf8(report.finish(&result(1)).unwrap()).unwrap();

        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["kind"], "changed");
        assert_eq!(lines[0]["right"], "c");
        assert_eq!(lines[1]["kind"], "result");
        assert_eq!(lines[1]["changed_rows"], 1);
        assert_eq!(lines[1]["matched"], false);
    }

    fn table(label: &str, rows: &[(i32, &str)]) -> MemoryRowSource {
        let rows: Vec<Row> = rows
            .iter()
            .map(|(id, name)| vec![SqlValue::I32(*id), SqlValue::text(*name)])
            .collect();
        MemoryRowSource::new(
            label,
            vec![
                ColumnDescriptor::new("id", ScanType::Int32),
                ColumnDescriptor::new("name", ScanType::RawBytes),
            ],
            rows,
        )
    }

    async fn render(left: &[(i32, &str)], right: &[(i32, &str)]) -> (DiffResult, String) {
        let mut left = table("bak_hoges", left);
        let mut right = table("hoges", right);
        let mut report = TextReport::new(Vec::new()).with_header("bak_hoges", "hoges");
        let result = DiffEngine::new(DiffOptions::new("bak_hoges", "hoges"))
            .run(&mut left, &mut right, &mut report)
            .await
            .unwrap();
        let output = text(report, &result);
        (result, output)
    }

    #[tokio::test]
    async fn test_changed_row_renders_and_differs() {
        let (result, output) = render(&[(1, "a"), (2, "b")], &[(1, "a"), (2, "c")]).await;

        assert!(!result.matched);
        assert_eq!(result.changed_rows, 1);
        assert_eq!(
            output,
            concat!(
                "--- bak_hoges\n",
                "+++ hoges\n",
                "    id=(   2,   2),                 name=(b,c)\n",
                "      1 rows are found\n",
            )
        );
    }

    #[tokio::test]
    async fn test_one_sided_rows_are_totalled() {
        let (result, output) = render(&[(1, "a")], &[]).await;

        assert!(!result.matched);
        assert_eq!(output, "--- bak_hoges\n+++ hoges\n-@@ id=1\n      1 rows are found\n");
    }

    #[tokio::test]
    async fn test_identical_tables_render_nothing() {
        let (result, output) = render(&[(1, "a"), (2, "b")], &[(1, "a"), (2, "b")]).await;

        assert!(result.matched);
        assert_eq!(output, "");
    }
}
