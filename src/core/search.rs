//! Case-insensitive substring search over the grid.
//!
//! A search scans the whole table once in row-major order and caches every
//! match; the current index then starts at the first match strictly after
//! the cursor, wrapping to the first match overall. That single rule
//! covers the wraparound scan order (rest of row, rows below, rows above,
//! start of row) without re-walking the table, and lands on the cursor's
//! own cell only when no other cell matches. `next`/`prev` walk the cached
//! list with wraparound in either direction.

use tracing::debug;

/// Absolute (row, col) of a match.
pub type MatchPos = (usize, usize);

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: String,
    matches: Vec<MatchPos>,
    idx: usize,
}

impl SearchState {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// 1-based index of the current match, 0 when there are none.
    pub fn current_number(&self) -> usize {
        if self.matches.is_empty() {
            0
        } else {
            self.idx + 1
        }
    }

    pub fn current(&self) -> Option<MatchPos> {
        self.matches.get(self.idx).copied()
    }

    /// Recompute the result list for `needle` and position on the first
    /// match after `cursor`. Returns the match to jump to, or `None` when
    /// nothing matched (the cursor must then stay put).
    pub fn run(&mut self, rows: &[Vec<String>], needle: &str, cursor: MatchPos) -> Option<MatchPos> {
        self.term = needle.to_lowercase();
        self.matches.clear();
        self.idx = 0;
        if self.term.is_empty() {
            return None;
        }
        for (y, row) in rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.to_lowercase().contains(&self.term) {
                    self.matches.push((y, x));
                }
            }
        }
        debug!(target: "search", "'{}': {} matches", self.term, self.matches.len());
        if self.matches.is_empty() {
            return None;
        }
        self.idx = self
            .matches
            .iter()
            .position(|&pos| pos > cursor)
            .unwrap_or(0);
        self.current()
    }

    pub fn next(&mut self) -> Option<MatchPos> {
        if self.matches.is_empty() {
            return None;
        }
        self.idx = (self.idx + 1) % self.matches.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<MatchPos> {
        if self.matches.is_empty() {
            return None;
        }
        self.idx = (self.idx + self.matches.len() - 1) % self.matches.len();
        self.current()
    }

    /// Drop cached positions while keeping the term. Used when a sort or
    /// reload made the coordinates meaningless.
    pub fn invalidate(&mut self) {
        self.matches.clear();
        self.idx = 0;
    }

    pub fn clear(&mut self) {
        self.term.clear();
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn finds_case_insensitive_substrings() {
        let rows = grid(&[
            &["Apple", "banana"],
            &["cherry", "PINEAPPLE"],
        ]);
        let mut s = SearchState::default();
        let hit = s.run(&rows, "apple", (0, 0));
        assert_eq!(s.match_count(), 2);
        // Cursor sits on the first match, so positioning starts after it.
        assert_eq!(hit, Some((1, 1)));
    }

    #[test]
    fn positions_on_first_match_after_cursor_with_wraparound() {
        let rows = grid(&[
            &["x", "hit", "x"],
            &["hit", "x", "x"],
            &["x", "x", "hit"],
        ]);
        let mut s = SearchState::default();
        assert_eq!(s.run(&rows, "hit", (1, 0)), Some((2, 2)));
        // From past the last match, the search wraps to the first.
        assert_eq!(s.run(&rows, "hit", (2, 2)), Some((0, 1)));
    }

    #[test]
    fn lone_match_is_found_from_anywhere() {
        let rows = grid(&[
            &["a", "b"],
            &["needle", "c"],
        ]);
        let mut s = SearchState::default();
        for cursor in [(0, 0), (1, 0), (1, 1)] {
            assert_eq!(s.run(&rows, "NEEDLE", cursor), Some((1, 0)));
        }
    }

    #[test]
    fn no_match_yields_empty_result_set() {
        let rows = grid(&[&["a", "b"]]);
        let mut s = SearchState::default();
        assert_eq!(s.run(&rows, "zzz", (0, 0)), None);
        assert_eq!(s.match_count(), 0);
        assert!(s.is_active());
        assert_eq!(s.next(), None);
        assert_eq!(s.prev(), None);
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let rows = grid(&[
            &["hit", "x"],
            &["x", "hit"],
        ]);
        let mut s = SearchState::default();
        s.run(&rows, "hit", (0, 0));
        assert_eq!(s.current(), Some((1, 1)));
        assert_eq!(s.next(), Some((0, 0)));
        assert_eq!(s.next(), Some((1, 1)));
        assert_eq!(s.prev(), Some((0, 0)));
        assert_eq!(s.prev(), Some((1, 1)));
    }

    #[test]
    fn invalidate_keeps_the_term() {
        let rows = grid(&[&["hit"]]);
        let mut s = SearchState::default();
        s.run(&rows, "hit", (0, 0));
        s.invalidate();
        assert!(s.is_active());
        assert_eq!(s.term(), "hit");
        assert_eq!(s.next(), None);
        assert_eq!(s.current_number(), 0);
    }
}
