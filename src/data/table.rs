//! TableBuffer - the normalized 2D grid behind the viewer.
//!
//! Pure data: no rendering, no cursor. The header row is held apart from the
//! data rows except while header display is toggled off, in which case it is
//! spliced back in as the first row. Exactly one of those two states holds at
//! any time.

use tracing::{debug, info};

use crate::data::sort::{sort_rows, SortMode};

#[derive(Debug, Clone)]
pub struct TableBuffer {
    name: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    column_count: usize,
    header_merged: bool,
}

impl TableBuffer {
    /// Build a table from raw records. The first record becomes the header;
    /// every row (header included) is padded to the widest record so the
    /// grid is rectangular. Fails on empty input.
    pub fn from_records(
        name: impl Into<String>,
        mut records: Vec<Vec<String>>,
    ) -> anyhow::Result<Self> {
        if records.is_empty() {
            anyhow::bail!("no rows to display");
        }
        let column_count = records.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for row in &mut records {
            row.resize(column_count, String::new());
        }
        let header = records.remove(0);
        let name = name.into();
        info!(
            target: "loader",
            "table '{}': {} data rows x {} columns", name, records.len(), column_count
        );
        Ok(Self {
            name,
            header,
            rows: records,
            column_count,
            header_merged: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of data rows currently in the grid (one more while the header
    /// is merged in).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Whether the header renders on its own chrome line (true) or sits
    /// merged into the data rows (false).
    pub fn header_shown(&self) -> bool {
        !self.header_merged
    }

    /// Cell lookup that never fails: out-of-range reads during rendering of
    /// partially-filled screen areas return an empty string.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Cell count of one row, 0 when the row does not exist. Rows are padded
    /// at construction, but callers treat this per-row so jagged data fed in
    /// through other paths still navigates sanely.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map(Vec::len).unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Toggle header visibility. Hiding splices the header in as row 0;
    /// showing again removes the first row equal to the header (it may have
    /// drifted from position 0 if the data was resorted meanwhile). Returns
    /// the new shown state.
    pub fn toggle_header(&mut self) -> bool {
        if self.header_merged {
            if let Some(pos) = self.rows.iter().position(|r| *r == self.header) {
                self.rows.remove(pos);
            }
            self.header_merged = false;
        } else {
            self.rows.insert(0, self.header.clone());
            self.header_merged = true;
        }
        debug!(target: "viewport", "header shown: {}", !self.header_merged);
        !self.header_merged
    }

    /// Stable sort of the data rows by `column`. The header never takes part:
    /// while merged it is pulled out for the sort and re-inserted on top.
    pub fn sort_by_column(&mut self, column: usize, mode: SortMode, descending: bool) {
        if column >= self.column_count {
            return;
        }
        let merged = self.header_merged;
        if merged {
            if let Some(pos) = self.rows.iter().position(|r| *r == self.header) {
                self.rows.remove(pos);
            }
        }
        sort_rows(&mut self.rows, column, mode, descending);
        if merged {
            self.rows.insert(0, self.header.clone());
        }
        info!(
            target: "sort",
            "sorted '{}' by column {} ({}, {})",
            self.name,
            column,
            mode.label(),
            if descending { "descending" } else { "ascending" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableBuffer {
        TableBuffer::from_records(
            "t",
            vec![
                vec!["name".into(), "qty".into()],
                vec!["pear".into(), "10".into()],
                vec!["apple".into(), "2".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn pads_ragged_records() {
        let t = TableBuffer::from_records(
            "t",
            vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["1".into()],
            ],
        )
        .unwrap();
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.row_len(0), 3);
        assert_eq!(t.cell(0, 2), "");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(TableBuffer::from_records("t", vec![]).is_err());
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let t = table();
        assert_eq!(t.cell(99, 0), "");
        assert_eq!(t.cell(0, 99), "");
        assert_eq!(t.row_len(99), 0);
    }

    #[test]
    fn toggle_twice_restores_row_count_and_header() {
        let mut t = table();
        let rows = t.row_count();
        assert!(t.header_shown());

        assert!(!t.toggle_header());
        assert_eq!(t.row_count(), rows + 1);
        assert_eq!(t.cell(0, 0), "name");

        assert!(t.toggle_header());
        assert_eq!(t.row_count(), rows);
        assert_eq!(t.header()[0], "name");
        assert_eq!(t.cell(0, 0), "pear");
    }

    #[test]
    fn sort_skips_merged_header() {
        let mut t = table();
        t.toggle_header();
        // "name" would sort between "apple" and "pear" if it took part.
        t.sort_by_column(0, SortMode::Lexical, false);
        assert_eq!(t.cell(0, 0), "name");
        assert_eq!(t.cell(1, 0), "apple");
        assert_eq!(t.cell(2, 0), "pear");

        t.toggle_header();
        assert_eq!(t.cell(0, 0), "apple");
    }

    #[test]
    fn sort_out_of_range_column_is_a_no_op() {
        let mut t = table();
        let before: Vec<String> = t.rows().iter().map(|r| r[0].clone()).collect();
        t.sort_by_column(42, SortMode::Lexical, false);
        let after: Vec<String> = t.rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(before, after);
    }
}
