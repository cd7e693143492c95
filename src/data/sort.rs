//! Cell comparators for the three row-sort key variants.
//!
//! All sorting goes through stable `sort_by`, so ties keep their prior
//! relative order in both directions.

use std::cmp::Ordering;

/// Key function used when ordering rows by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Raw string comparison.
    Lexical,
    /// Digit runs compared as integers, text runs as strings.
    Natural,
    /// Cells parsed as f64; unparseable cells form a trailing bucket.
    Numeric,
}

impl SortMode {
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Lexical => "lexical",
            SortMode::Natural => "natural",
            SortMode::Numeric => "numeric",
        }
    }
}

/// Stable in-place sort of `rows` by the cell in `column`.
///
/// Rows shorter than `column` compare with an empty cell.
pub fn sort_rows(rows: &mut [Vec<String>], column: usize, mode: SortMode, descending: bool) {
    rows.sort_by(|ra, rb| {
        let a = ra.get(column).map(String::as_str).unwrap_or("");
        let b = rb.get(column).map(String::as_str).unwrap_or("");
        let ord = compare_cells(a, b, mode);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

pub fn compare_cells(a: &str, b: &str, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Lexical => a.cmp(b),
        SortMode::Natural => compare_natural(a, b),
        SortMode::Numeric => compare_numeric(a, b),
    }
}

/// Alternating digit/non-digit run of a cell.
#[derive(Debug, PartialEq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(if digits {
            Run::Digits(head)
        } else {
            Run::Text(head)
        })
    }
}

fn runs(s: &str) -> Runs<'_> {
    Runs { rest: s }
}

/// Human-expected ordering: "item2" sorts before "item10".
///
/// Digit runs compare against text runs as uniformly smaller so mixed
/// columns still get a total order.
fn compare_natural(a: &str, b: &str) -> Ordering {
    let mut ra = runs(a);
    let mut rb = runs(b);
    loop {
        match (ra.next(), rb.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x, y) {
                    (Run::Digits(da), Run::Digits(db)) => compare_digit_runs(da, db),
                    (Run::Digits(_), Run::Text(_)) => Ordering::Less,
                    (Run::Text(_), Run::Digits(_)) => Ordering::Greater,
                    (Run::Text(ta), Run::Text(tb)) => ta.cmp(tb),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Compare two all-digit runs as integers of arbitrary length.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Type-then-value ordering: numeric cells first (by value), everything
/// that fails to parse after them (lexically among themselves).
fn compare_numeric(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(cells: &[&str]) -> Vec<Vec<String>> {
        cells.iter().map(|c| vec![c.to_string()]).collect()
    }

    fn column(rows: &[Vec<String>]) -> Vec<&str> {
        rows.iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn natural_orders_embedded_numbers() {
        let mut rows = rows_of(&["item2", "item10", "item1"]);
        sort_rows(&mut rows, 0, SortMode::Natural, false);
        assert_eq!(column(&rows), vec!["item1", "item2", "item10"]);
    }

    #[test]
    fn natural_handles_leading_zeros() {
        assert_eq!(compare_natural("a01", "a1"), Ordering::Equal);
        assert_eq!(compare_natural("a002", "a1"), Ordering::Greater);
    }

    #[test]
    fn natural_long_digit_runs_do_not_overflow() {
        assert_eq!(
            compare_natural("x99999999999999999999999", "x100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn lexical_descending_is_reverse_of_ascending_for_distinct_keys() {
        let mut asc = rows_of(&["pear", "apple", "fig"]);
        let mut desc = asc.clone();
        sort_rows(&mut asc, 0, SortMode::Lexical, false);
        sort_rows(&mut desc, 0, SortMode::Lexical, true);
        let mut reversed = column(&desc);
        reversed.reverse();
        assert_eq!(column(&asc), reversed);
    }

    #[test]
    fn numeric_puts_unparseable_cells_in_trailing_bucket() {
        let mut rows = rows_of(&["10", "n/a", "2", "", "3.5"]);
        sort_rows(&mut rows, 0, SortMode::Numeric, false);
        assert_eq!(column(&rows), vec!["2", "3.5", "10", "", "n/a"]);
    }

    #[test]
    fn stable_sort_preserves_tie_order() {
        let mut rows: Vec<Vec<String>> = vec![
            vec!["b".into(), "first".into()],
            vec!["a".into(), "second".into()],
            vec!["b".into(), "third".into()],
        ];
        sort_rows(&mut rows, 0, SortMode::Lexical, false);
        assert_eq!(rows[1][1], "first");
        assert_eq!(rows[2][1], "third");

        // Descending reverses the comparator, not the tie order.
        sort_rows(&mut rows, 0, SortMode::Lexical, true);
        assert_eq!(rows[0][1], "first");
        assert_eq!(rows[1][1], "third");
    }
}
